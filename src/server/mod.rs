pub mod api;

use crate::agent::VideoAgent;
use crate::cli::Args;
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    agent: Arc<VideoAgent>,
    args: Args,
}

impl Server {
    pub fn new(agent: Arc<VideoAgent>, args: Args) -> Self {
        Self { agent, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(Arc::clone(&self.agent), self.args.clone()).await
    }
}
