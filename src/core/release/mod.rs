pub mod resolver;

pub use resolver::{
    resolve_latest, select_asset, GithubReleases, Release, ReleaseAsset, ReleaseSource,
    ResolvedAsset,
};
