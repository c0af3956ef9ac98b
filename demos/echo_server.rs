//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Echo Server Example
//!
//! This example demonstrates a TELNET echo server that:
//! - Accepts connections on port 2323
//! - Offers to echo and suppress go-ahead
//! - Asks each client for its window size and terminal type
//! - Echoes back any data received
//!
//! ## Usage
//!
//! Run the server:
//! ```bash
//! cargo run --example echo_server
//! ```
//!
//! Connect with a telnet client:
//! ```bash
//! telnet localhost 2323
//! ```

use telwire_protocol::consts::option;
use telwire_protocol::handlers::{NegotiateAboutWindowSize, TerminalType};
use telwire_protocol::{OptionStateListener, Session, SessionListener};
use telwire_service::SessionStarter;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    println!("Starting Telwire Echo Server on 127.0.0.1:2323");
    println!("Connect with: telnet localhost 2323");
    println!("Press Ctrl+C to stop the server\n");

    let listener = TcpListener::bind("127.0.0.1:2323").await?;
    let starter = SessionStarter::server();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer_addr) = accepted?;
                info!(peer_addr = %peer_addr, "Accepted connection");
                let (_handle, task) = starter.start_session(stream, new_session(), EchoHandler);
                tokio::spawn(async move {
                    match task.await {
                        Ok(Ok(())) => info!(peer_addr = %peer_addr, "Connection finished"),
                        Ok(Err(e)) => error!(peer_addr = %peer_addr, error = %e, "Connection failed"),
                        Err(e) => error!(peer_addr = %peer_addr, error = %e, "Session task panicked"),
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\nShutting down server...");
                break;
            }
        }
    }

    Ok(())
}

/// Options offered to every client
fn new_session() -> Session {
    let mut session = Session::new();
    session.option(option::ECHO).request_local_enable();
    session.option(option::SGA).request_local_enable();

    NegotiateAboutWindowSize::new()
        .on_reported(|size| info!(window_size = %size, "Client resized"))
        .attach(&mut session);
    NegotiateAboutWindowSize::enable_remote(&mut session);

    TerminalType::new()
        .on_reported(|name| info!(terminal_type = name, "Client terminal"))
        .attach(&mut session);
    session
        .option(option::TTYPE)
        .add_state_listener(AskTerminalType)
        .request_remote_enable();
    session
}

/// Requests the client's terminal type once it agrees to send it
struct AskTerminalType;

impl OptionStateListener for AskTerminalType {
    fn enabled_remotely(&mut self, session: &mut Session) {
        TerminalType::request_next(session);
    }
}

/// Echoes everything back to the client
struct EchoHandler;

impl SessionListener for EchoHandler {
    fn incoming_data(&mut self, data: &[u8], session: &mut Session) {
        session.write(data);
    }

    fn connected(&mut self, session: &mut Session) {
        session.write(b"Welcome to the Telwire echo server!\r\n");
    }

    fn do_are_you_there(&mut self, session: &mut Session) {
        session.write(b"\r\n[yes]\r\n");
    }
}
