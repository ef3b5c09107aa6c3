//! End-to-end enrollment flow against the file-backed store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use coursegate::challenge::ChallengeSource;
use coursegate::clock::NoopSleeper;
use coursegate::common::{
    CheckoutRequest, EnrollError, Offering, PaymentOutcome, WizardStage,
};
use coursegate::store::{EnrollmentStore, JsonFileStore};
use coursegate::{EnrollmentWizard, WizardConfig, WizardDeps};

fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("coursegate=debug")
        .with_test_writer()
        .try_init();
}

struct KnownText;

impl ChallengeSource for KnownText {
    fn next_text(&self) -> String {
        "AbCdEf".to_string()
    }
}

struct RecordingGateway {
    seen: Mutex<Vec<CheckoutRequest>>,
}

#[async_trait]
impl coursegate::payment::PaymentGateway for RecordingGateway {
    async fn open(&self, request: CheckoutRequest) -> Result<PaymentOutcome, EnrollError> {
        self.seen.lock().await.push(request);
        Ok(PaymentOutcome::Completed {
            payment_id: "pay_123".to_string(),
        })
    }
}

#[tokio::test]
async fn purchase_persists_a_single_record_on_disk() {
    init_logs();

    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("courseEnrollments.json");

    let offering = Offering {
        id: 12,
        title: "Swing Trading Bootcamp".into(),
        instructor: "Rahul Verma".into(),
        price: "₹5,999".into(),
        original_price: Some("₹9,999".into()),
    };

    let gateway = Arc::new(RecordingGateway {
        seen: Mutex::new(Vec::new()),
    });
    let store = Arc::new(JsonFileStore::new(&store_path));

    // Two enrollment sessions for the same offering: the second purchase
    // must not duplicate the record.
    for _ in 0..2 {
        let deps = WizardDeps {
            store: store.clone(),
            gateway: gateway.clone(),
            sleeper: Arc::new(NoopSleeper),
            challenge_source: Arc::new(KnownText),
        };
        let wizard = EnrollmentWizard::new(offering.clone(), WizardConfig::default(), deps);

        wizard.submit_challenge("ABCDEF").await.unwrap();
        wizard.request_code("user@example.com").await.unwrap();
        wizard.confirm_code("271828").await.unwrap();
        wizard.pay().await.unwrap();
        assert_eq!(wizard.stage().await, WizardStage::Closed);
    }

    let seen = gateway.seen.lock().await;
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].amount_minor, 599_900);
    assert_eq!(seen[0].currency, "INR");

    let records = store.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].course_id, 12);
    assert_eq!(records[0].progress, 0);

    // The file itself carries the camelCase list another session can read
    let raw = std::fs::read_to_string(&store_path).unwrap();
    assert!(raw.contains("courseId"));
    assert!(raw.contains("Swing Trading Bootcamp"));
}
