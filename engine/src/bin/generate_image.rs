use std::{io::stdout, time::Duration};

use clap::Parser;
use color_eyre::Result;
use grsai::{
    cli::ImageArgs, clock::TokioClock, config::Env, tools::image, transport::ReqwestTransport,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    grsai::init_logging();
    let args = ImageArgs::parse();

    image::run(
        args,
        &Env::from_process(),
        ReqwestTransport::new(REQUEST_TIMEOUT),
        TokioClock,
        &mut stdout().lock(),
    )
    .await?;
    Ok(())
}
