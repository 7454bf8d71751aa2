#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("unknown http method {0:?}")]
    UnknownMethod(String),

    #[error("invalid regular expression in segment {segment:?}")]
    InvalidRegex {
        segment: String,
        #[source]
        source: regex::Error,
    },

    #[error("url pair {index} has an empty name or value")]
    InvalidUrlPair { index: usize },

    #[error("router is sealed: routes can not be added after the first match")]
    Sealed,

    #[error("route with name {0:?} does not exist")]
    UnknownRoute(String),

    #[error("route name can not be empty")]
    EmptyRouteName,

    #[error("route with name {0:?} already exists")]
    DuplicateRouteName(String),

    #[error("no route has been registered to name")]
    NoRouteToName,
}
