use std::io::{self, Write};

use crate::cli::ExportArgs;
use crate::dispatch::Dispatcher;
use crate::error::{AppError, Result};
use crate::notify::NotificationKind;

pub async fn run(dispatcher: &Dispatcher, args: ExportArgs) -> Result<()> {
    let user = dispatcher.fetch_user(args.id).await?;
    let json = serde_json::to_string_pretty(&user)?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, format!("{json}\n")).map_err(AppError::Io)?;
            dispatcher.notify(
                format!("User {} exported to {}", user.id, path.display()),
                NotificationKind::Success,
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}
