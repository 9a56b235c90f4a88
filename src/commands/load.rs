use crate::cli::UsersArgs;
use crate::dispatch::Dispatcher;
use crate::endpoint::{self, UserFilter};
use crate::error::Result;
use crate::output::Renderer;

/// Load `input` and print whatever the display shows afterwards, including the
/// cleared state after a failure.
pub async fn show(dispatcher: &Dispatcher, renderer: &Renderer, input: &str) -> Result<()> {
    let result = dispatcher.load(input).await;
    renderer.print(&dispatcher.view())?;
    result.map(|_| ())
}

pub async fn users(dispatcher: &Dispatcher, renderer: &Renderer, args: UsersArgs) -> Result<()> {
    let filter = UserFilter::from_args(args.city, args.job);
    let url = endpoint::users_url(dispatcher.base_url(), &filter)?;
    show(dispatcher, renderer, &url).await
}

pub async fn user(dispatcher: &Dispatcher, renderer: &Renderer, id: u64) -> Result<()> {
    let url = endpoint::user_url(dispatcher.base_url(), id)?;
    show(dispatcher, renderer, &url).await
}
