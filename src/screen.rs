//! The add-meal screen: camera or manual barcode entry, lookup display state and
//! meal submission. Errors never escape as failures of the screen itself; they land
//! in [`AddMealScreen::error`] as the inline message and the user can retry.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::camera::{default_profiles, CameraProvider, ConstraintProfile, Orientation};
use crate::error::{AppError, AppResult};
use crate::meals::{submit_draft, MealApi, MealDraft};
use crate::nutrients::{serving_calories, NutrientKey, DISPLAY_NUTRIENTS};
use crate::products::{LookupCoordinator, LookupOutcome, ResolvedProduct};
use crate::scanner::{FrameDecoder, ScanSession};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Camera,
    Manual,
}

/// One line of the nutrient table.
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientRow {
    pub key: NutrientKey,
    pub label: String,
    pub per_100g: f64,
    pub per_serving: Option<f64>,
}

pub struct AddMealScreen {
    user_id: i64,
    camera: Arc<dyn CameraProvider>,
    decoder: Arc<dyn FrameDecoder>,
    meals: Arc<dyn MealApi>,
    profiles: Vec<ConstraintProfile>,
    lookups: LookupCoordinator,
    mode: InputMode,
    session: Option<ScanSession>,
    barcode: String,
    product: Option<ResolvedProduct>,
    serving_input: String,
    error: Option<String>,
    success: bool,
}

impl AddMealScreen {
    /// Mounts in camera mode. A camera failure is shown, not returned.
    pub async fn open(state: &AppState, user_id: i64) -> Self {
        let mut screen = Self {
            user_id,
            camera: state.camera.clone(),
            decoder: state.decoder.clone(),
            meals: state.meals.clone(),
            profiles: default_profiles(),
            lookups: LookupCoordinator::new(state.products.clone()),
            mode: InputMode::Camera,
            session: None,
            barcode: String::new(),
            product: None,
            serving_input: String::new(),
            error: None,
            success: false,
        };
        let _ = screen.start_camera().await;
        screen
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn product(&self) -> Option<&ResolvedProduct> {
        self.product.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last lookup failure seen by the running scan session.
    pub fn scan_error(&self) -> Option<&str> {
        self.session.as_ref().and_then(ScanSession::last_error)
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn is_scanning(&self) -> bool {
        self.session.as_ref().map_or(false, ScanSession::is_active)
    }

    pub fn orientation(&self) -> Orientation {
        self.session
            .as_ref()
            .map(ScanSession::orientation)
            .unwrap_or_default()
    }

    pub fn set_barcode(&mut self, input: impl Into<String>) {
        self.barcode = input.into();
    }

    pub fn set_serving(&mut self, input: impl Into<String>) {
        self.serving_input = input.into();
    }

    /// Releases any held camera before acquiring a new stream.
    pub async fn start_camera(&mut self) -> AppResult<()> {
        self.stop_camera();
        match ScanSession::start(self.camera.clone(), self.decoder.as_ref(), &self.profiles).await {
            Ok(session) => {
                self.session = Some(session);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "camera unavailable");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    fn stop_camera(&mut self) {
        if let Some(mut session) = self.session.take() {
            debug!(session_id = %session.id(), "scan session closed");
            session.teardown();
        }
    }

    /// Switches between camera and manual entry; both directions start from a clean slate.
    pub async fn toggle_mode(&mut self) {
        self.barcode.clear();
        self.product = None;
        self.error = None;
        self.success = false;
        match self.mode {
            InputMode::Camera => {
                self.stop_camera();
                self.mode = InputMode::Manual;
            }
            InputMode::Manual => {
                self.mode = InputMode::Camera;
                let _ = self.start_camera().await;
            }
        }
        debug!(mode = ?self.mode, "input mode switched");
    }

    /// Handles one debounced camera candidate. `false` once there is nothing left to scan.
    pub async fn scan_once(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(code) = session.next_candidate().await else {
            return false;
        };

        self.barcode = code.clone();
        let outcome = self.lookups.lookup(&code).await;
        let result = self.apply_outcome(outcome);

        if self.product.is_some() {
            self.stop_camera();
        } else if let Some(session) = self.session.as_mut() {
            if let Err(e) = result {
                session.record_error(e.user_message());
            }
            session.lookup_finished();
        }
        true
    }

    /// Scans until a product resolves or the camera stops producing candidates.
    pub async fn scan_until_resolved(&mut self) -> bool {
        while self.product.is_none() {
            if !self.scan_once().await {
                return false;
            }
        }
        true
    }

    /// Looks up whatever the user typed.
    pub async fn submit_manual(&mut self, raw: &str) -> AppResult<()> {
        self.barcode = raw.to_string();
        let outcome = self.lookups.lookup(raw).await;
        self.apply_outcome(outcome)
    }

    fn apply_outcome(&mut self, outcome: LookupOutcome) -> AppResult<()> {
        self.success = false;
        match outcome {
            LookupOutcome::Stale { .. } => Ok(()),
            LookupOutcome::Current(Ok(product)) => {
                self.error = None;
                self.product = Some(product);
                Ok(())
            }
            LookupOutcome::Current(Err(e)) => {
                if matches!(e, AppError::ProductNotFound(_)) {
                    self.product = None;
                }
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Drops the resolved product and, in camera mode, goes back to scanning.
    pub async fn cancel_product(&mut self) {
        self.product = None;
        self.barcode.clear();
        self.serving_input.clear();
        self.error = None;
        if self.mode == InputMode::Camera {
            let _ = self.start_camera().await;
        }
    }

    /// Sends the meal. Validation failures keep the product on screen; once a request
    /// is sent the draft is gone whatever the backend answers.
    pub async fn submit_meal(&mut self) -> AppResult<Option<i64>> {
        self.success = false;
        self.error = None;
        let draft = match MealDraft::new(self.user_id, self.product.as_ref(), &self.serving_input) {
            Ok(draft) => draft,
            Err(e) => {
                self.error = Some(e.user_message());
                return Err(e);
            }
        };

        self.product = None;
        self.barcode.clear();
        self.serving_input.clear();

        let result = submit_draft(self.meals.as_ref(), draft).await;
        match &result {
            Ok(meal_id) => {
                info!(?meal_id, "meal added");
                self.success = true;
            }
            Err(e) => self.error = Some(e.user_message()),
        }

        if self.mode == InputMode::Camera {
            let _ = self.start_camera().await;
        }
        result
    }

    /// Every recognized nutrient; missing values read as 0.
    pub fn nutrient_rows(&self) -> Vec<NutrientRow> {
        let Some(product) = &self.product else {
            return Vec::new();
        };
        let grams = crate::meals::parse_serving(&self.serving_input).ok();
        let nutriments = &product.record.nutriments;
        DISPLAY_NUTRIENTS
            .iter()
            .map(|&key| NutrientRow {
                key,
                label: key.label(),
                per_100g: key.per_100g(nutriments),
                per_serving: grams.map(|g| key.for_serving(nutriments, g)),
            })
            .collect()
    }

    /// Calories for the entered serving, once both a product and a valid serving exist.
    pub fn serving_calories(&self) -> Option<i64> {
        let product = self.product.as_ref()?;
        let grams = crate::meals::parse_serving(&self.serving_input).ok()?;
        Some(serving_calories(&product.record.nutriments, grams))
    }

    /// Navigating away.
    pub fn close(mut self) {
        self.stop_camera();
    }
}

impl Drop for AddMealScreen {
    fn drop(&mut self) {
        self.stop_camera();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::camera::fake::FakeCamera;
    use crate::meals::client::fake::FakeMeals;
    use crate::products::services::tests::FakeLookup;
    use crate::scanner::fake::ScriptedDecoder;
    use crate::scanner::NoopDecoder;

    struct Harness {
        state: AppState,
        camera: Arc<FakeCamera>,
        lookup: Arc<FakeLookup>,
        meals: Arc<FakeMeals>,
    }

    fn harness(camera: FakeCamera, lookup: FakeLookup, frames: Vec<&'static str>) -> Harness {
        let camera = Arc::new(camera);
        let lookup = Arc::new(lookup);
        let meals = Arc::new(FakeMeals::new());
        let mut state = AppState::fake();
        state.camera = camera.clone();
        state.products = lookup.clone();
        state.meals = meals.clone();
        state.decoder = Arc::new(ScriptedDecoder::new(frames));
        Harness {
            state,
            camera,
            lookup,
            meals,
        }
    }

    fn calls(lookup: &FakeLookup) -> usize {
        lookup.calls.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn manual_entry_shows_serving_calories() {
        let h = harness(FakeCamera::working(), FakeLookup::new(), vec![]);
        let mut screen = AddMealScreen::open(&h.state, 7).await;
        screen.toggle_mode().await;
        assert_eq!(screen.mode(), InputMode::Manual);

        screen.submit_manual("123 456 7").await.unwrap();
        assert_eq!(screen.product().unwrap().barcode.as_str(), "1234567");
        screen.set_serving("150");
        assert_eq!(screen.serving_calories(), Some(78));

        let rows = screen.nutrient_rows();
        assert_eq!(rows.len(), 39);
        assert_eq!(rows[0].label, "Calories (kcal / 100g)");
        assert_eq!(rows[0].per_serving, Some(78.0));
        assert_eq!(rows[1].per_100g, 0.0);
    }

    #[tokio::test]
    async fn invalid_manual_code_makes_no_request() {
        let h = harness(FakeCamera::working(), FakeLookup::new(), vec![]);
        let mut screen = AddMealScreen::open(&h.state, 7).await;
        screen.toggle_mode().await;
        assert!(matches!(
            screen.submit_manual("12a34").await,
            Err(AppError::InvalidBarcode(_))
        ));
        assert_eq!(screen.error(), Some("Barcode must contain only digits."));
        assert_eq!(calls(&h.lookup), 0);
    }

    #[tokio::test]
    async fn not_found_clears_previous_product() {
        let mut lookup = FakeLookup::new();
        lookup.missing.push("999");
        let h = harness(FakeCamera::working(), lookup, vec![]);
        let mut screen = AddMealScreen::open(&h.state, 7).await;
        screen.toggle_mode().await;

        screen.submit_manual("111").await.unwrap();
        assert!(screen.product().is_some());
        assert!(screen.submit_manual("999").await.is_err());
        assert!(screen.product().is_none());
        assert_eq!(screen.error(), Some("product not found"));
    }

    #[tokio::test]
    async fn empty_serving_blocks_submission() {
        let h = harness(FakeCamera::working(), FakeLookup::new(), vec![]);
        let mut screen = AddMealScreen::open(&h.state, 7).await;
        screen.toggle_mode().await;
        screen.submit_manual("1234567").await.unwrap();

        assert!(matches!(screen.submit_meal().await, Err(AppError::MissingServingSize)));
        assert_eq!(screen.error(), Some("Please enter a serving size in grams."));
        assert!(screen.product().is_some());
        assert_eq!(h.meals.sent_count(), 0);
    }

    #[tokio::test]
    async fn submit_without_product_is_rejected() {
        let h = harness(FakeCamera::working(), FakeLookup::new(), vec![]);
        let mut screen = AddMealScreen::open(&h.state, 7).await;
        screen.set_serving("100");
        assert!(matches!(screen.submit_meal().await, Err(AppError::NoProductResolved)));
        assert_eq!(h.meals.sent_count(), 0);
    }

    #[tokio::test]
    async fn insecure_origin_fails_before_stream_request() {
        let mut camera = FakeCamera::working();
        camera.secure = false;
        let h = harness(camera, FakeLookup::new(), vec!["1"]);
        let screen = AddMealScreen::open(&h.state, 7).await;
        assert_eq!(screen.error(), Some("Camera requires HTTPS on mobile browsers."));
        assert!(!screen.is_scanning());
        assert_eq!(h.camera.requested_count(), 0);
    }

    #[tokio::test]
    async fn repeated_frames_trigger_one_lookup() {
        let mut lookup = FakeLookup::new();
        lookup.missing.push("555");
        let h = harness(FakeCamera::working(), lookup, vec!["555", "555", "555", "777"]);
        let mut screen = AddMealScreen::open(&h.state, 7).await;

        assert!(screen.scan_until_resolved().await);
        assert_eq!(calls(&h.lookup), 2);
        assert_eq!(screen.product().unwrap().barcode.as_str(), "777");
        assert!(!screen.is_scanning());
        assert_eq!(h.camera.open_streams(), 0);
    }

    #[tokio::test]
    async fn failed_scan_lookup_keeps_scanning_with_error() {
        let mut lookup = FakeLookup::new();
        lookup.missing.push("555");
        let h = harness(FakeCamera::working(), lookup, vec!["555"]);
        let mut screen = AddMealScreen::open(&h.state, 7).await;

        assert!(screen.scan_once().await);
        assert!(screen.is_scanning());
        assert!(screen.product().is_none());
        assert_eq!(screen.scan_error(), Some("product not found"));
        assert_eq!(h.camera.open_streams(), 1);
    }

    #[tokio::test]
    async fn submitted_meal_resets_and_rescans() {
        let h = harness(FakeCamera::working(), FakeLookup::new(), vec!["123 456 7"]);
        let mut screen = AddMealScreen::open(&h.state, 7).await;
        assert!(screen.scan_until_resolved().await);
        screen.set_serving("150");

        assert_eq!(screen.submit_meal().await.unwrap(), Some(1));
        assert!(screen.success());
        assert!(screen.product().is_none());
        assert_eq!(screen.barcode(), "");
        assert!(screen.is_scanning());

        let sent = h.meals.sent.lock().unwrap();
        assert_eq!(sent[0].barcode, "1234567");
        assert_eq!(sent[0].user_id, 7);
        assert_eq!(sent[0].product_name, "product 1234567");
    }

    #[tokio::test]
    async fn rejected_submission_still_discards_draft() {
        let mut h = harness(FakeCamera::working(), FakeLookup::new(), vec![]);
        let meals = Arc::new(FakeMeals {
            reject: Some("Meal rejected"),
            ..FakeMeals::new()
        });
        h.state.meals = meals.clone();
        let mut screen = AddMealScreen::open(&h.state, 7).await;
        screen.toggle_mode().await;
        screen.submit_manual("42").await.unwrap();
        screen.set_serving("10");

        match screen.submit_meal().await {
            Err(AppError::SubmissionFailed(msg)) => assert_eq!(msg, "Meal rejected"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(screen.product().is_none());
        assert!(!screen.success());
        assert_eq!(screen.error(), Some("Meal rejected"));
        assert_eq!(meals.sent_count(), 1);
    }

    #[tokio::test]
    async fn camera_released_on_every_exit() {
        let h = harness(FakeCamera::working(), FakeLookup::new(), vec![]);

        let mut screen = AddMealScreen::open(&h.state, 7).await;
        assert!(screen.is_scanning());
        screen.toggle_mode().await;
        assert_eq!(h.camera.open_streams(), 0);

        screen.toggle_mode().await;
        assert_eq!(h.camera.open_streams(), 1);
        screen.start_camera().await.unwrap();
        assert_eq!(h.camera.open_streams(), 1);
        screen.close();
        assert_eq!(h.camera.open_streams(), 0);

        {
            let _screen = AddMealScreen::open(&h.state, 7).await;
            assert_eq!(h.camera.open_streams(), 1);
        }
        assert_eq!(h.camera.open_streams(), 0);
    }

    #[tokio::test]
    async fn cancel_product_reacquires_camera() {
        let mut h = harness(FakeCamera::working(), FakeLookup::new(), vec![]);
        h.state.decoder = Arc::new(NoopDecoder);
        let mut screen = AddMealScreen::open(&h.state, 7).await;
        screen.submit_manual("1234567").await.unwrap();
        screen.set_serving("20");
        screen.cancel_product().await;
        assert!(screen.product().is_none());
        assert_eq!(screen.serving_calories(), None);
        assert!(screen.is_scanning());
        assert_eq!(h.camera.open_streams(), 1);
    }
}
