use async_trait::async_trait;
use stacksmith::core::{ChangeSetService, ObjectStore, TemplateRenderer};
use stacksmith::domain::model::ChangeSetRequest;
use stacksmith::templates::LambdaFunctionTemplate;
use stacksmith::{ChangeRequest, ChangeSetReceipt, DeployError, Operation, Result, Runner};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tokio_test::{assert_err, assert_ok};

#[derive(Clone, Default)]
struct RecordingStore {
    log: Arc<Mutex<Vec<String>>>,
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl ObjectStore for RecordingStore {
    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        self.log.lock().await.push(format!("put {}/{}", bucket, key));
        self.objects
            .lock()
            .await
            .insert(format!("{}/{}", bucket, key), data);
        Ok(())
    }
}

#[derive(Clone)]
struct RecordingChangeSets {
    log: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<String>>>,
    existing: Vec<String>,
}

#[async_trait]
impl ChangeSetService for RecordingChangeSets {
    async fn create_change_set(&self, request: ChangeSetRequest) -> Result<ChangeSetReceipt> {
        self.log
            .lock()
            .await
            .push(format!("create {}", request.change_set_name));

        if self.existing.contains(&request.change_set_name) {
            return Err(DeployError::ChangeSetRejected {
                stack_name: request.stack_name,
                change_set_name: request.change_set_name.clone(),
                code: Some("AlreadyExistsException".to_string()),
                message: format!("ChangeSet {} already exists", request.change_set_name),
            });
        }

        self.bodies.lock().await.push(request.template_body);
        Ok(ChangeSetReceipt {
            id: Some(format!("arn:aws:cloudformation:changeSet/{}", request.change_set_name)),
            stack_id: Some(format!("arn:aws:cloudformation:stack/{}", request.stack_name)),
        })
    }
}

fn write_artifact(dir: &TempDir) -> String {
    let path = dir.path().join("orders-lambda-1.0.zip");
    std::fs::write(&path, b"lambda bytes").unwrap();
    path.to_str().unwrap().to_string()
}

fn request(filename: String, change_set_name: &str) -> ChangeRequest {
    ChangeRequest {
        stack_name: "OrdersStack".to_string(),
        key_name: "deploy-key".to_string(),
        change_set_name: change_set_name.to_string(),
        token: format!("{}-token", change_set_name),
        description: "Deploy orders lambda".to_string(),
        operation: Operation::Create,
        bucket_name: "deploy-artifacts".to_string(),
        filename,
    }
}

fn collaborators(existing: &[&str]) -> (Arc<Mutex<Vec<String>>>, RecordingStore, RecordingChangeSets) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let store = RecordingStore {
        log: log.clone(),
        objects: Arc::default(),
    };
    let change_sets = RecordingChangeSets {
        log: log.clone(),
        bodies: Arc::default(),
        existing: existing.iter().map(|s| s.to_string()).collect(),
    };
    (log, store, change_sets)
}

#[tokio::test]
async fn test_lambda_template_deployment() {
    let dir = TempDir::new().unwrap();
    let (log, store, change_sets) = collaborators(&[]);
    let runner = Runner::new(
        request(write_artifact(&dir), "OrdersStack-changeset-1"),
        store.clone(),
        change_sets.clone(),
        LambdaFunctionTemplate::default(),
    )
    .unwrap();

    let receipt = assert_ok!(runner.run().await);
    assert_eq!(
        receipt.id.as_deref(),
        Some("arn:aws:cloudformation:changeSet/OrdersStack-changeset-1")
    );

    assert_eq!(
        log.lock().await.clone(),
        vec![
            "put deploy-artifacts/orders-lambda-1.0.zip".to_string(),
            "create OrdersStack-changeset-1".to_string()
        ]
    );

    let objects = store.objects.lock().await;
    assert_eq!(
        objects.get("deploy-artifacts/orders-lambda-1.0.zip").unwrap(),
        &b"lambda bytes".to_vec()
    );

    // 樣板裡的 Lambda 程式碼要指向剛上傳的物件
    let bodies = change_sets.bodies.lock().await;
    let body: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(
        body["Resources"]["LambdaFunction"]["Properties"]["Code"],
        serde_json::json!({"S3Bucket": "deploy-artifacts", "S3Key": "orders-lambda-1.0.zip"})
    );
}

#[tokio::test]
async fn test_duplicate_change_set_orphans_artifact() {
    let dir = TempDir::new().unwrap();
    let (log, store, change_sets) = collaborators(&["OrdersStack-changeset-1"]);
    let runner = Runner::new(
        request(write_artifact(&dir), "OrdersStack-changeset-1"),
        store.clone(),
        change_sets,
        LambdaFunctionTemplate::default(),
    )
    .unwrap();

    let error = assert_err!(runner.run().await);
    assert!(error.to_string().contains("already exists"));
    assert_eq!(log.lock().await.len(), 2);
    assert_eq!(store.objects.lock().await.len(), 1);
}

#[tokio::test]
async fn test_steps_can_be_driven_separately() {
    let dir = TempDir::new().unwrap();
    let (log, store, change_sets) = collaborators(&[]);
    let runner = Runner::new(
        request(write_artifact(&dir), "OrdersStack-changeset-2"),
        store,
        change_sets,
        LambdaFunctionTemplate::default(),
    )
    .unwrap();

    let artifact = runner.upload_artifact().await.unwrap();
    assert_eq!(log.lock().await.len(), 1);
    assert_eq!(artifact.key(), "orders-lambda-1.0.zip");

    assert_ok!(runner.submit_change(&artifact).await);
    assert_eq!(log.lock().await.len(), 2);
}

#[tokio::test]
async fn test_missing_artifact_never_contacts_aws() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("not-built.jar").to_str().unwrap().to_string();
    let (log, store, change_sets) = collaborators(&[]);
    let runner = Runner::new(
        request(missing, "OrdersStack-changeset-3"),
        store,
        change_sets,
        LambdaFunctionTemplate::default(),
    )
    .unwrap();

    let error = assert_err!(runner.run().await);
    assert!(matches!(error, DeployError::ArtifactNotFound { .. }));
    assert!(log.lock().await.is_empty());
}

#[test]
fn test_template_renderer_is_object_safe() {
    let renderer: Box<dyn TemplateRenderer> = Box::new(LambdaFunctionTemplate::default());
    assert_eq!(renderer.name(), "lambda-function");
}
