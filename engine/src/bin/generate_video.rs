use std::{io::stdout, time::Duration};

use clap::Parser;
use color_eyre::Result;
use grsai::{
    cli::VideoArgs, clock::TokioClock, config::Env, tools::video, transport::ReqwestTransport,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    grsai::init_logging();
    let args = VideoArgs::parse();

    let outcome = video::run(
        args,
        &Env::from_process(),
        ReqwestTransport::new(REQUEST_TIMEOUT),
        TokioClock,
        &mut stdout().lock(),
    )
    .await?;
    println!(
        "Resolution: {}, duration: {}s",
        outcome.resolution, outcome.duration_seconds
    );
    Ok(())
}
