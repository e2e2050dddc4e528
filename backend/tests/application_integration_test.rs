use async_trait::async_trait;
use std::sync::Arc;
use tempfile::TempDir;
use trackml::application::{
    dto::{ModelDraft, ModelFilter, ModelPatch, SearchRequest, SearchType, WorkspacePatch},
    repositories::{UserRepository, WorkspaceRepository},
    services::{
        ModelService, SemanticSearchConfig, SemanticSearchService, ServiceError,
        WorkspaceService, DEFAULT_WORKSPACE_NAME,
    },
    use_cases::SearchModels,
};
use trackml::domain::{
    base::Entity,
    value_objects::{Email, EmbeddingVector, SearchScope, UserId},
};
use trackml::infrastructure::embeddings::{EmbeddingError, EmbeddingGateway, EmbeddingProvider};
use trackml::infrastructure::persistence::SqliteRepository;

fn register(repo: &mut SqliteRepository, username: &str) -> UserId {
    let email = Email::new(format!("{}@example.com", username)).unwrap();
    *repo.insert_user(username, &email).unwrap().id()
}

fn draft(name: &str, developer: &str, model_type: &str, tags: &[&str]) -> ModelDraft {
    ModelDraft {
        developer: Some(developer.to_string()),
        model_type: Some(model_type.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..ModelDraft::new(name)
    }
}

/// Puts vision models on one axis and language models on the other
struct ModalityProvider;

#[async_trait]
impl EmbeddingProvider for ModalityProvider {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let text = text.to_lowercase();
        let values = if text.contains("vision") || text.contains("image") {
            vec![1.0, 0.1]
        } else if text.contains("language") || text.contains("text") {
            vec![0.1, 1.0]
        } else {
            return Err(EmbeddingError::Provider("unsupported modality".to_string()));
        };
        Ok(EmbeddingVector::new(values)?)
    }
}

#[test]
fn test_models_persist_across_connections() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("trackml.db");

    let (owner, model_id) = {
        let mut repo = SqliteRepository::new_with_path(&db_path).unwrap();
        let owner = register(&mut repo, "ada");
        let mut service = ModelService::new(repo);
        let model = service
            .create_model(&owner, draft("ResNet-50", "Microsoft", "Vision", &["cnn"]))
            .unwrap();
        (owner, *model.id())
    };

    let service = ModelService::new(SqliteRepository::new_with_path(&db_path).unwrap());
    let model = service.get_model(&model_id, &owner).unwrap().unwrap();

    assert_eq!(model.name(), "ResNet-50");
    assert_eq!(model.tags(), &["cnn".to_string()]);
    let default = service
        .repository()
        .find_default_workspace(&owner)
        .unwrap()
        .unwrap();
    assert_eq!(default.name(), DEFAULT_WORKSPACE_NAME);
    assert_eq!(model.workspace_id(), Some(default.id()));
}

#[test]
fn test_model_lifecycle() {
    let mut repo = SqliteRepository::new_in_memory().unwrap();
    let owner = register(&mut repo, "ada");
    let mut service = ModelService::new(repo);

    let model = service
        .create_model(&owner, draft("GPT-2", "OpenAI", "LLM", &["legacy"]))
        .unwrap();

    let updated = service
        .update_model(
            model.id(),
            &owner,
            ModelPatch {
                notes: Some("Still handy for quick experiments".to_string()),
                ..ModelPatch::default()
            },
        )
        .unwrap();
    assert_eq!(
        updated.details().notes.as_deref(),
        Some("Still handy for quick experiments")
    );

    let tagged = service
        .update_model_tags(model.id(), &owner, vec!["baseline".to_string()])
        .unwrap();
    assert_eq!(tagged.tags(), &["baseline".to_string()]);

    assert!(service.delete_model(model.id(), &owner).unwrap());
    assert!(service.get_user_models(&owner, None).unwrap().is_empty());
}

#[test]
fn test_users_are_isolated() {
    let mut repo = SqliteRepository::new_in_memory().unwrap();
    let ada = register(&mut repo, "ada");
    let grace = register(&mut repo, "grace");
    let mut service = ModelService::new(repo);

    let model = service
        .create_model(&ada, draft("CLIP", "OpenAI", "Vision", &[]))
        .unwrap();

    assert!(service.get_model(model.id(), &grace).unwrap().is_none());
    assert!(!service.delete_model(model.id(), &grace).unwrap());
    assert!(matches!(
        service.update_model(model.id(), &grace, ModelPatch::default()),
        Err(ServiceError::NotFound(_))
    ));
    assert!(service.get_all_tags(&grace).unwrap().is_empty());
}

#[test]
fn test_keyword_search_through_service() {
    let mut repo = SqliteRepository::new_in_memory().unwrap();
    let owner = register(&mut repo, "ada");
    let mut service = ModelService::new(repo);

    service
        .create_model(&owner, draft("Whisper", "OpenAI", "ASR", &["audio"]))
        .unwrap();
    service
        .create_model(&owner, draft("Llama 3", "Meta", "LLM", &["chat"]))
        .unwrap();
    service
        .create_model(&owner, draft("Code Llama", "Meta", "LLM", &["code"]))
        .unwrap();

    let by_developer = ModelFilter {
        query: Some("meta".to_string()),
        ..ModelFilter::default()
    };
    assert_eq!(service.search_models(&owner, &by_developer).unwrap().len(), 2);

    let by_type_and_tag = ModelFilter {
        model_type: Some("LLM".to_string()),
        tags: vec!["code".to_string()],
        ..ModelFilter::default()
    };
    let found = service.search_models(&owner, &by_type_and_tag).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name(), "Code Llama");
}

#[tokio::test]
async fn test_search_use_case_over_sqlite() {
    let mut repo = SqliteRepository::new_in_memory().unwrap();
    let owner = register(&mut repo, "ada");
    let mut service = ModelService::new(repo);

    service
        .create_model(&owner, draft("Llama 3", "Meta", "LLM", &[]))
        .unwrap();
    service
        .create_model(&owner, draft("Code Llama", "Meta", "LLM", &[]))
        .unwrap();
    service
        .create_model(&owner, draft("Llama", "Meta", "LLM", &[]))
        .unwrap();

    let search = SearchModels::new(service.repository());
    let results = search
        .execute(SearchRequest::new("llama", SearchScope::owner(owner)))
        .await
        .unwrap();

    let ranked: Vec<(&str, f64)> = results
        .iter()
        .map(|r| (r.model.name.as_str(), r.relevance_score))
        .collect();
    assert_eq!(
        ranked,
        vec![("Llama", 1.0), ("Llama 3", 0.9), ("Code Llama", 0.7)]
    );
}

#[tokio::test]
async fn test_semantic_search_over_sqlite() {
    let mut repo = SqliteRepository::new_in_memory().unwrap();
    let owner = register(&mut repo, "ada");
    let mut service = ModelService::new(repo);

    service
        .create_model(&owner, draft("ViT", "Google", "Vision", &["image"]))
        .unwrap();
    service
        .create_model(&owner, draft("BERT", "Google", "Language", &[]))
        .unwrap();
    // Matches neither modality, so the provider rejects it
    service
        .create_model(&owner, draft("AlphaFold", "DeepMind", "Biology", &[]))
        .unwrap();

    let semantic = Arc::new(SemanticSearchService::new(
        EmbeddingGateway::new(Arc::new(ModalityProvider)),
        SemanticSearchConfig::default(),
    ));
    let search = SearchModels::with_semantic_search(service.repository(), semantic);

    let request = SearchRequest::new("image classification", SearchScope::owner(owner))
        .with_search_type(SearchType::Semantic);
    let results = search.execute(request).await.unwrap();

    let names: Vec<&str> = results.iter().map(|r| r.model.name.as_str()).collect();
    assert_eq!(names, vec!["ViT", "BERT"]);
    assert!(results[0].relevance_score > results[1].relevance_score);
}

#[tokio::test]
async fn test_semantic_search_respects_workspace_scope() {
    let mut repo = SqliteRepository::new_in_memory().unwrap();
    let owner = register(&mut repo, "ada");
    let mut workspaces = WorkspaceService::new(repo);
    let vision = workspaces
        .create_workspace(&owner, "Vision", Some("Image models"))
        .unwrap();

    let mut service = ModelService::new(workspaces.into_inner());
    service
        .create_model(
            &owner,
            ModelDraft {
                workspace_id: Some(*vision.id()),
                ..draft("DINOv2", "Meta", "Vision", &[])
            },
        )
        .unwrap();
    service
        .create_model(&owner, draft("SAM", "Meta", "Vision", &[]))
        .unwrap();

    let semantic = Arc::new(SemanticSearchService::new(
        EmbeddingGateway::new(Arc::new(ModalityProvider)),
        SemanticSearchConfig::default(),
    ));
    let search = SearchModels::with_semantic_search(service.repository(), semantic);

    let request = SearchRequest::new("vision backbone", SearchScope::workspace(owner, *vision.id()))
        .with_search_type(SearchType::Semantic);
    let results = search.execute(request).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].model.name, "DINOv2");
}

#[test]
fn test_workspace_management() {
    let mut repo = SqliteRepository::new_in_memory().unwrap();
    let owner = register(&mut repo, "ada");
    let mut workspaces = WorkspaceService::new(repo);

    let default = workspaces.get_or_create_default_workspace(&owner).unwrap();
    let research = workspaces.create_workspace(&owner, "Research", None).unwrap();

    let renamed = workspaces
        .update_workspace(
            research.id(),
            &owner,
            WorkspacePatch {
                name: Some("Papers".to_string()),
                description: None,
            },
        )
        .unwrap();
    assert_eq!(renamed.name(), "Papers");

    let names: Vec<String> = workspaces
        .get_user_workspaces(&owner)
        .unwrap()
        .iter()
        .map(|w| w.name().to_string())
        .collect();
    assert_eq!(names, vec![DEFAULT_WORKSPACE_NAME.to_string(), "Papers".to_string()]);

    assert!(!workspaces.delete_workspace(default.id(), &owner).unwrap());
    assert!(workspaces.delete_workspace(research.id(), &owner).unwrap());
    assert_eq!(workspaces.get_user_workspaces(&owner).unwrap().len(), 1);
}
