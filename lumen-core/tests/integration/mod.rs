mod handshake;
mod poller;
mod wallet_session;
