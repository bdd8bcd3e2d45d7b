//! agenda board command implementation

use crate::error::Result;
use crate::ui::board;

use super::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let store = ctx.store(&config)?;
    board::run(store, config)
}
