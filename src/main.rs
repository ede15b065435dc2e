//! Entry point of the palaver chat server.

use palaver::{net, Config, State};
use std::path::Path;
use std::{env, io, process};

const USAGE: &str = "USAGE: palaver <host> <port>
       palaver <config-file>";

fn main() {
    let config = match config_from_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run(&config) {
        log::error!("{}", err);
        process::exit(1);
    }
}

fn config_from_args() -> Result<Config, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [host, port] => Config::from_host_port(host, port).map_err(|err| err.to_string()),
        [path] => Config::from_file(Path::new(path)).map_err(|err| err.to_string()),
        _ => Err("expected a host and a port, or a configuration file".to_owned()),
    }
}

fn run(config: &Config) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let listener = net::bind(config)?;
        let state = State::new();
        tokio::select! {
            result = net::accept_loop(listener, state) => result,
            result = tokio::signal::ctrl_c() => {
                log::info!("interrupted, shutting down");
                result
            }
        }
    })
}
