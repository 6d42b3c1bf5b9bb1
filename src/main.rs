use std::process;

use totp_clip::cli::{self, Outcome};
use totp_clip::host::SystemHost;
use totp_clip::Options;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let mut host = SystemHost::new();
    match cli::run(std::env::args_os(), &mut host, &Options::default()) {
        Ok(Outcome::Usage) | Ok(Outcome::Copied(_)) => {}
        Err(error) => {
            eprintln!("{}", error);
            process::exit(1)
        }
    }
}
