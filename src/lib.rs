pub mod io_struct;
pub mod relay_state;
pub mod server;
pub mod transcript;
