use std::{io::stdout, time::Duration};

use clap::Parser;
use color_eyre::Result;
use grsai::{
    cli::QueryArgs, clock::TokioClock, config::Env, tools::query, transport::ReqwestTransport,
};

/// Gemini can take a while on long answers.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    grsai::init_logging();
    let args = QueryArgs::parse();

    query::run(
        args,
        &Env::from_process(),
        ReqwestTransport::new(REQUEST_TIMEOUT),
        TokioClock,
        &mut stdout().lock(),
    )
    .await?;
    Ok(())
}
