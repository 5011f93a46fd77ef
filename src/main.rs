mod args;

use args::Args;
use clap::Parser;
use iconfont::{
    emit::{self, Converters, OutputLayout},
    CancellationToken, CompileOptions, IconFontError, Pipeline,
};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    if let Err(e) = run(&args, cancel).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: &Args, cancel: CancellationToken) -> Result<(), IconFontError> {
    let before = std::time::Instant::now();
    let payload = Pipeline::new()
        .with_cancellation(cancel.clone())
        .compile(CompileOptions::from(args))
        .await?;
    log::info!(
        "Prepared {} glyphs in {:.2?}",
        payload.glyphs.len(),
        before.elapsed()
    );

    let layout = OutputLayout::for_payload(&payload);
    let converters = Converters::default();
    emit::emit(&payload, &layout, args.convert.then_some(&converters), &cancel).await?;
    log::info!("Done!");
    Ok(())
}
