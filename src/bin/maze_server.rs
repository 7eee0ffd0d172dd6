use std::net::TcpListener;

use anyhow::Context;

use doom_raycaster::net::arena::Arena;
use doom_raycaster::net::server::serve;
use doom_raycaster::{init_logging, Settings};

fn main() -> anyhow::Result<()> {
    init_logging();
    let settings = Settings::from_args().context("loading settings")?;
    let (w, h) = settings.arena_size;
    let listener = TcpListener::bind(("0.0.0.0", settings.net_port))
        .with_context(|| format!("binding port {}", settings.net_port))?;
    serve(listener, Arena::new(w, h))?;
    Ok(())
}
