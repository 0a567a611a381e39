//! Serverless entry point. Every invocation is routed by the event's path.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use landomat::{
    config::AppConfig,
    function::{handle_event, FunctionEvent, FunctionResponse},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    landomat::init_production_tracing();

    let config = AppConfig::load()?;
    let app_state = AppState::from_config(&config)?;

    run(service_fn(move |event: LambdaEvent<FunctionEvent>| {
        let app_state = app_state.clone();
        async move { Ok::<FunctionResponse, Error>(handle_event(&app_state, event.payload).await) }
    }))
    .await
}
