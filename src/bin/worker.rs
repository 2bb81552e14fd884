pub use birthday_bot::worker::handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    birthday_bot::setup_logging();
    lambda_runtime::run(lambda_runtime::service_fn(handler)).await
}
