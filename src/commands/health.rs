use crate::classify::InfoPayload;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::output::{OutputFormat, Renderer};
use crate::view::View;

/// Connection test. The display is left untouched; the health body is printed on its own.
pub async fn run(dispatcher: &Dispatcher, format: OutputFormat) -> Result<()> {
    let response = dispatcher.check_health().await?;
    let view = View::Info(InfoPayload::from(&response));
    Renderer::new(format).print(&view)
}
