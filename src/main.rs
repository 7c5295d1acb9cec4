use story_weaver::{app::App, logging, settings::{Settings, get_data_dir}};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let settings = Settings::load()?;
    logging::init(get_data_dir()?, settings.debug_mode)?;
    log::info!("Story Weaver start: {}", chrono::Local::now());

    let mut app = App::new(settings);
    let result = app.run().await;
    if let Err(e) = &result {
        log::error!("Story Weaver stopped with an error: {e:?}");
    }
    result
}
