use log::error;

#[tokio::main]
async fn main()
{   env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = match blueprint_ai::BlueprintConfig::from_env()
    {   Ok(config) => config
      , Err(e) => {
          error!("{}", e);
          std::process::exit(1);
        }
    };

    if let Err(e) = blueprint_ai::server::run(config).await
    {   error!("{}", e);
        std::process::exit(1);
    }
}
