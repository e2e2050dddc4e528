//! TrackML command-line interface
//!
//! Every command prints JSON on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use trackml::application::{
    ModelDraft, ModelService, ModelView, SearchModels, SearchRequest, SearchType,
    SemanticSearchService, UserRepository, WorkspaceService, WorkspaceView,
};
use trackml::config::AppConfig;
use trackml::domain::{Email, Entity, SearchScope, UserId, WorkspaceId};
use trackml::infrastructure::persistence::SqliteRepository;
use trackml::logging::init_tracing;

#[derive(Parser)]
#[command(name = "trackml")]
#[command(author, version, about = "Track the ML models you work with", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a user
    AddUser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,
    },

    /// Record a model for a user
    AddModel {
        /// Owning user id
        #[arg(long)]
        user: i64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        developer: Option<String>,

        #[arg(long)]
        model_type: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        license: Option<String>,

        #[arg(long)]
        version: Option<String>,

        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Comma-separated source links
        #[arg(long, value_delimiter = ',')]
        links: Vec<String>,

        /// Target workspace; defaults to the user's default workspace
        #[arg(long)]
        workspace: Option<i64>,
    },

    /// List a user's models
    List {
        #[arg(long)]
        user: i64,

        #[arg(long)]
        workspace: Option<i64>,
    },

    /// Search a user's models
    Search {
        #[arg(long)]
        user: i64,

        query: String,

        /// Rank by embedding similarity instead of keywords
        #[arg(long)]
        semantic: bool,

        #[arg(long, default_value_t = trackml::application::dto::DEFAULT_TOP_K)]
        top_k: usize,

        #[arg(long)]
        workspace: Option<i64>,
    },

    /// List a user's workspaces
    Workspaces {
        #[arg(long)]
        user: i64,
    },
}

#[derive(Serialize)]
struct UserOutput {
    id: UserId,
    username: String,
    email: String,
    is_active: bool,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn scope_for(user: UserId, workspace: Option<i64>) -> Result<SearchScope> {
    Ok(match workspace {
        Some(id) => SearchScope::workspace(user, WorkspaceId::new(id)?),
        None => SearchScope::owner(user),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = AppConfig::from_env()?;
    let mut repository = SqliteRepository::new_with_path(&config.database_path).with_context(|| {
        format!(
            "Failed to open database at {}",
            config.database_path.display()
        )
    })?;

    match cli.command {
        Commands::AddUser { username, email } => {
            let user = repository.insert_user(&username, &Email::new(email)?)?;
            info!("Registered user {}", user.id());
            print_json(&UserOutput {
                id: *user.id(),
                username: user.username().to_string(),
                email: user.email().to_string(),
                is_active: user.is_active(),
            })?;
        }

        Commands::AddModel {
            user,
            name,
            developer,
            model_type,
            notes,
            license,
            version,
            tags,
            links,
            workspace,
        } => {
            let owner = UserId::new(user)?;
            let draft = ModelDraft {
                developer,
                model_type,
                notes,
                license,
                version,
                tags,
                source_links: links,
                workspace_id: workspace.map(WorkspaceId::new).transpose()?,
                ..ModelDraft::new(name)
            };

            let mut service = ModelService::new(repository);
            let model = service.create_model(&owner, draft)?;
            print_json(&ModelView::from(&model))?;
        }

        Commands::List { user, workspace } => {
            let owner = UserId::new(user)?;
            let workspace = workspace.map(WorkspaceId::new).transpose()?;

            let service = ModelService::new(repository);
            let models: Vec<ModelView> = service
                .get_user_models(&owner, workspace.as_ref())?
                .iter()
                .map(ModelView::from)
                .collect();
            print_json(&models)?;
        }

        Commands::Search {
            user,
            query,
            semantic,
            top_k,
            workspace,
        } => {
            let scope = scope_for(UserId::new(user)?, workspace)?;
            let search_type = if semantic {
                SearchType::Semantic
            } else {
                SearchType::Traditional
            };
            let request = SearchRequest::new(query, scope)
                .with_search_type(search_type)
                .with_top_k(top_k);

            let results = if semantic {
                let gateway = config.embedding_gateway().await?;
                let service = Arc::new(SemanticSearchService::new(gateway, config.search.clone()));
                SearchModels::with_semantic_search(&repository, service)
                    .execute(request)
                    .await?
            } else {
                SearchModels::new(&repository).execute(request).await?
            };
            print_json(&results)?;
        }

        Commands::Workspaces { user } => {
            let owner = UserId::new(user)?;

            let mut service = WorkspaceService::new(repository);
            service.get_or_create_default_workspace(&owner)?;
            let workspaces: Vec<WorkspaceView> = service
                .get_user_workspaces(&owner)?
                .iter()
                .map(WorkspaceView::from)
                .collect();
            print_json(&workspaces)?;
        }
    }

    Ok(())
}
