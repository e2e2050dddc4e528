/// Value objects for the domain layer
use super::base::{DomainError, DomainResult, ValueObject};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(id: i64) -> DomainResult<Self> {
                if id <= 0 {
                    return Err(DomainError::InvalidValue(format!(
                        "{} must be positive, got {}",
                        $label, id
                    )));
                }
                Ok($name(id))
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl ValueObject for $name {}

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Unique identifier for a tracked model record
    ModelId,
    "ModelId"
);
numeric_id!(
    /// Unique identifier for a user
    UserId,
    "UserId"
);
numeric_id!(
    /// Unique identifier for a workspace
    WorkspaceId,
    "WorkspaceId"
);

/// A validated email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> DomainResult<Self> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = PATTERN.get_or_init(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
        });

        let email = email.into();
        if !pattern.is_match(&email) {
            return Err(DomainError::InvalidValue(format!(
                "Invalid email address: {}",
                email
            )));
        }
        Ok(Email(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Email {}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The set of records a caller is allowed to see: one owner, optionally narrowed to a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchScope {
    owner: UserId,
    workspace: Option<WorkspaceId>,
}

impl SearchScope {
    pub fn owner(owner: UserId) -> Self {
        SearchScope {
            owner,
            workspace: None,
        }
    }

    pub fn workspace(owner: UserId, workspace: WorkspaceId) -> Self {
        SearchScope {
            owner,
            workspace: Some(workspace),
        }
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner
    }

    pub fn workspace_id(&self) -> Option<&WorkspaceId> {
        self.workspace.as_ref()
    }
}

impl ValueObject for SearchScope {}

/// Local embedding models available to the fastembed provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingModel {
    /// sentence-transformers/all-MiniLM-L6-v2
    #[default]
    AllMiniLML6V2,
}

impl EmbeddingModel {
    pub fn dimension_count(&self) -> usize {
        match self {
            EmbeddingModel::AllMiniLML6V2 => 384,
        }
    }
}

impl ValueObject for EmbeddingModel {}

impl fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingModel::AllMiniLML6V2 => write!(f, "all-MiniLM-L6-v2"),
        }
    }
}

/// A dense embedding produced by an embedding provider.
///
/// Always non-empty and made of finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector {
    values: Vec<f64>,
}

impl EmbeddingVector {
    pub fn new(values: Vec<f64>) -> DomainResult<Self> {
        if values.is_empty() {
            return Err(DomainError::InvalidValue(
                "Embedding vector cannot be empty".to_string(),
            ));
        }
        if let Some(position) = values.iter().position(|v| !v.is_finite()) {
            return Err(DomainError::InvalidValue(format!(
                "Embedding vector has a non-finite value at position {}",
                position
            )));
        }
        Ok(EmbeddingVector { values })
    }

    pub fn from_f32(values: Vec<f32>) -> DomainResult<Self> {
        Self::new(values.into_iter().map(f64::from).collect())
    }

    pub fn dimension_count(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Euclidean length, computed on values scaled into [-1, 1] so that
    /// squaring neither overflows nor underflows.
    pub fn norm(&self) -> f64 {
        let scale = self.max_abs();
        if scale == 0.0 {
            return 0.0;
        }
        self.values
            .iter()
            .map(|v| (v / scale) * (v / scale))
            .sum::<f64>()
            .sqrt()
            * scale
    }

    fn max_abs(&self) -> f64 {
        self.values.iter().fold(0.0, |max, v| max.max(v.abs()))
    }

    /// Cosine similarity in [-1, 1]. A zero-norm vector on either side scores 0.
    ///
    /// Both sides are divided by their largest magnitude first, which leaves
    /// the angle unchanged and keeps every intermediate value finite.
    pub fn cosine_similarity(&self, other: &EmbeddingVector) -> DomainResult<f64> {
        if self.dimension_count() != other.dimension_count() {
            return Err(DomainError::InvalidOperation(format!(
                "Cannot compare embeddings of dimension {} and {}",
                self.dimension_count(),
                other.dimension_count()
            )));
        }

        let (scale_a, scale_b) = (self.max_abs(), other.max_abs());
        if scale_a == 0.0 || scale_b == 0.0 {
            return Ok(0.0);
        }

        let (mut dot, mut norm_a, mut norm_b) = (0.0, 0.0, 0.0);
        for (a, b) in self.values.iter().zip(other.values.iter()) {
            let (a, b) = (a / scale_a, b / scale_b);
            dot += a * b;
            norm_a += a * a;
            norm_b += b * b;
        }

        let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
        if !similarity.is_finite() {
            return Ok(0.0);
        }
        Ok(similarity.clamp(-1.0, 1.0))
    }
}

impl ValueObject for EmbeddingVector {}
