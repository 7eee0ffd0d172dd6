use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

use doom_raycaster::net::arena::Arena;
use doom_raycaster::net::client::Client;
use doom_raycaster::net::protocol::Direction;
use doom_raycaster::net::server::serve;

const WAIT: Duration = Duration::from_secs(5);

fn start_server() -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || serve(listener, Arena::new(800, 600)));
    addr
}

/// Waits until `pred` holds for the client's latest snapshot.
fn wait_until(client: &mut Client, pred: impl Fn(&Client) -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if pred(client) {
            return true;
        }
        client.wait_for_update(Duration::from_millis(50));
    }
    pred(client)
}

#[test]
fn join_move_and_leave_are_broadcast() {
    let addr = start_server();

    let mut a = Client::connect(addr).unwrap();
    assert!(wait_until(&mut a, |c| c.position() == Some((20, 20))));

    a.send(Direction::Right).unwrap();
    assert!(wait_until(&mut a, |c| c.position() == Some((25, 20))));

    let b = Client::connect(addr).unwrap();
    assert!(wait_until(&mut a, |c| c.snapshot().players.len() == 2));
    assert!(wait_until(&mut a, |c| c.snapshot().players.get(&b.local_addr()) == Some(&(780, 20))));

    drop(b);
    assert!(wait_until(&mut a, |c| c.snapshot().players.len() == 1));
    assert!(a.is_connected());
}

#[test]
fn blocked_moves_keep_position() {
    let addr = start_server();
    let mut a = Client::connect(addr).unwrap();
    assert!(wait_until(&mut a, |c| c.position() == Some((20, 20))));

    // clamped against the top edge, the server still answers with a snapshot
    a.send(Direction::Up).unwrap();
    a.send(Direction::Down).unwrap();
    assert!(wait_until(&mut a, |c| c.position() == Some((20, 25))));
}
