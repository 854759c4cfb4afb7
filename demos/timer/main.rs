use std::{env::args, time::Duration};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tick_node::*;

// usage: cargo run --example timer [tick_period_ms] [ticks]
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    TermLogger::init(LevelFilter::Info, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)
    .unwrap_or_else(|err| log::warn!("{err}"));

    let mut args = args().skip(1);
    let tick_period_ms: u64 = args.next().map(|arg| arg.parse()).transpose()?.unwrap_or(1_000);
    let ticks: u64 = args.next().map(|arg| arg.parse()).transpose()?.unwrap_or(5);

    let config = CounterConfig::default().with_tick_period(Duration::from_millis(tick_period_ms));
    let mut counter = IntervalCounter::new(config, IntervalSource::current()?)?;

    println!("{}", counter.view());

    counter.toggle();
    while counter.current_state().elapsed_ticks() < ticks {
        if counter.process_async().await? {
            println!("{}", counter.view());
        }
    }

    counter.toggle();
    println!("{}", counter.view());

    let last = counter.teardown();
    log::info!("stopped after {} ticks", last.elapsed_ticks());
    Ok(())
}
