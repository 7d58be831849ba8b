pub mod common;
pub mod pagerank;
pub mod community;
pub mod pathfinding;
pub mod centrality;

pub use common::{GraphView, NodeId, UndirectedView};
pub use pagerank::{page_rank, PageRankConfig, PageRankResult};
pub use community::{louvain, modularity, weakly_connected_components, LouvainConfig, LouvainResult, WccResult};
pub use pathfinding::{bfs_distances, path_metrics, PathMetrics};
pub use centrality::{
    betweenness_centrality, closeness_centrality, eigenvector_centrality, EigenvectorConfig,
    EigenvectorResult,
};
