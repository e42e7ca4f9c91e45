use std::process;

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = dl_video::cli::parse();
    init_logging(args.log_filter());

    match dl_video::run(args).await {
        Ok(finals) => {
            for path in finals {
                println!("final file:{}", path.display());
            }
        }
        Err(e) => {
            tracing::debug!("run failed: {:?}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
