use crate::backend::BackendClient;
use crate::camera::{CameraProvider, HeadlessCamera};
use crate::config::AppConfig;
use crate::meals::MealApi;
use crate::products::{FoodDbClient, ProductLookup};
use crate::scanner::{FrameDecoder, NoopDecoder};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: BackendClient,
    pub products: Arc<dyn ProductLookup>,
    pub meals: Arc<dyn MealApi>,
    pub camera: Arc<dyn CameraProvider>,
    pub decoder: Arc<dyn FrameDecoder>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        Self::from_config(config)
    }

    pub fn from_config(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let backend = BackendClient::new(&config)?;
        let products = Arc::new(FoodDbClient::new(&config)?) as Arc<dyn ProductLookup>;
        // Shares the session cookie jar with `backend`.
        let meals = Arc::new(backend.clone()) as Arc<dyn MealApi>;

        // No capture device outside a browser.
        let camera = Arc::new(HeadlessCamera::new(config.origin.clone())) as Arc<dyn CameraProvider>;
        let decoder = Arc::new(NoopDecoder) as Arc<dyn FrameDecoder>;

        Ok(Self::from_parts(config, backend, products, meals, camera, decoder))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        backend: BackendClient,
        products: Arc<dyn ProductLookup>,
        meals: Arc<dyn MealApi>,
        camera: Arc<dyn CameraProvider>,
        decoder: Arc<dyn FrameDecoder>,
    ) -> Self {
        Self {
            config,
            backend,
            products,
            meals,
            camera,
            decoder,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::camera::fake::FakeCamera;
        use crate::meals::client::fake::FakeMeals;
        use crate::products::services::tests::FakeLookup;
        use crate::scanner::fake::ScriptedDecoder;

        let config = Arc::new(AppConfig::local("http://127.0.0.1:9"));
        let backend = BackendClient::new(&config).expect("client builds");

        Self::from_parts(
            config,
            backend,
            Arc::new(FakeLookup::new()),
            Arc::new(FakeMeals::new()),
            Arc::new(FakeCamera::working()),
            Arc::new(ScriptedDecoder::new(vec!["123 456 7"])),
        )
    }
}
