pub use birthday_bot::api::handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    birthday_bot::setup_logging();
    lambda_runtime::run(lambda_runtime::service_fn(handler)).await
}
