use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

use super::graphml::write_graphml;
use crate::errors::SerializeError;
use crate::graph::LineageGraph;
use lineage_shared::GraphName;

/// Where the dump of `graph` lives inside `dir`.
pub fn dump_path(dir: &Path, graph: GraphName) -> PathBuf {
    dir.join(format!("{}.graphml", graph.as_str().to_ascii_lowercase()))
}

/// Write `graph` as GraphML to `<dir>/<graph>.graphml`.
///
/// The document goes to a temporary file in `dir` that is renamed over the
/// target once complete, so a failed dump never replaces a previous one.
pub fn dump_graph(
    graph: &LineageGraph,
    name: GraphName,
    dir: &Path,
) -> Result<PathBuf, SerializeError> {
    fs::create_dir_all(dir)?;
    let target = dump_path(dir, name);

    let mut file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(&mut file);
        write_graphml(graph, name.as_str(), &mut writer)?;
        writer.flush()?;
    }
    file.as_file().sync_all()?;
    file.persist(&target)?;

    info!(
        graph = %name,
        path = %target.display(),
        vertex_count = graph.vertex_count(),
        edge_count = graph.edge_count(),
        "Dumped graph"
    );
    Ok(target)
}
