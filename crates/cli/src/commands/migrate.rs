use crate::commands::{open_database, prepare, CommandResult};

pub fn run() -> CommandResult {
    let context = match prepare() {
        Ok(context) => context,
        Err(error) => return CommandResult::from_error("migrate", &error),
    };

    let result = context.runtime.block_on(async {
        let pool = open_database(&context.config).await?;
        pool.close().await;
        Ok::<(), vestia_core::ApplicationError>(())
    });

    match result {
        Ok(()) => CommandResult::success("migrate", "applied pending migrations"),
        Err(error) => CommandResult::from_error("migrate", &error),
    }
}
