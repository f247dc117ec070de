use crate::config::{Config, UploadMode};
use crate::context::Context;
use crate::player::Player;

pub struct Builder<C: Context> {
    context: Option<C>,
    config: Config,
}

impl<C: Context> Builder<C> {
    pub fn new() -> Self {
        Self {
            context: None,
            config: Config::default(),
        }
    }

    pub fn with_context(mut self, ctx: C) -> Self {
        self.context = Some(ctx);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock_frequency(mut self, hz: u32) -> Self {
        self.config.clock_frequency = hz;
        self
    }

    pub fn with_upload_mode(mut self, mode: UploadMode) -> Self {
        self.config.upload = mode;
        self
    }

    pub fn with_heartbeat_shift(mut self, shift: u32) -> Self {
        self.config.heartbeat_shift = shift;
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.config.echo = echo;
        self
    }

    pub fn build(self) -> Result<Player<C>, &'static str> {
        let context = self.context.ok_or("Context not provided")?;
        if self.config.clock_frequency == 0 {
            return Err("Clock frequency must not be zero");
        }
        if self.config.heartbeat_shift >= u32::BITS {
            return Err("Heartbeat shift must be below 32");
        }
        Ok(Player::new(context, self.config))
    }
}

impl<C: Context> Default for Builder<C> {
    fn default() -> Self {
        Self::new()
    }
}
