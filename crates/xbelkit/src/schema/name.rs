//! Qualified names

use std::fmt;

/// Namespace URI plus local name
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    namespace: String,
    local_name: String,
}

impl QName {
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_name: local_name.into(),
        }
    }

    /// Name in no namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self::new(String::new(), local_name)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Same namespace, local name with `prefix` in front
    pub fn with_local_prefix(&self, prefix: &str) -> Self {
        Self {
            namespace: self.namespace.clone(),
            local_name: format!("{prefix}{}", self.local_name),
        }
    }
}

/// Clark notation: `{namespace}local`, or just `local` without a namespace
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local_name)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local_name)
        }
    }
}
