use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lqrrt_tree::{LqrEdge, NodeId, Tree, TreeConfig, TreeError};
use nalgebra::DMatrix;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lqrrt-tree", about = "Inspect and exercise LQR-RT* planning trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Grow a tree from an edge list and report its shape.
    Replay {
        /// Edge file: seed state on the first line, then `<parent> <state...>` per line.
        edges: PathBuf,
        /// Print the ancestor chain of this node.
        #[arg(long)]
        climb: Option<i64>,
    },
    /// Grow a large tree and verify every ancestor chain.
    Stress {
        /// Number of nodes to append after the root.
        #[arg(long, default_value_t = 10_000)]
        nodes: usize,
        /// State dimension.
        #[arg(long, default_value_t = 4)]
        nstates: usize,
        /// Children per node (1 grows a single chain).
        #[arg(long, default_value_t = 2)]
        branching: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { edges, climb } => run_replay(edges, climb)?,
        Commands::Stress {
            nodes,
            nstates,
            branching,
        } => run_stress(nodes, nstates, branching)?,
    }

    Ok(())
}

fn run_replay(edges_path: PathBuf, climb: Option<i64>) -> Result<()> {
    let reader = BufReader::new(
        File::open(&edges_path)
            .with_context(|| format!("failed to open edge file {}", edges_path.display()))?,
    );
    let (tree, rejected) = read_edges(reader)
        .with_context(|| format!("failed to replay {}", edges_path.display()))?;

    let depths = depths(&tree);
    let max_depth = depths.iter().copied().max().unwrap_or(0);
    println!(
        "nodes={}\tnstates={}\trejected={}\tmax_depth={}",
        tree.size(),
        tree.nstates(),
        rejected,
        max_depth
    );

    if let Some(raw) = climb {
        let id = tree.checked_id(raw)?;
        let chain = tree.climb(id)?;
        let rendered: Vec<String> = chain.iter().map(|id| id.index().to_string()).collect();
        println!("climb {}: {}", raw, rendered.join(" -> "));
        for id in chain.iter().rev() {
            println!("  {}\t{:?}", id, &tree[*id]);
        }
    }

    Ok(())
}

/// Grow a tree from an edge list, returning it with the number of rejected edges.
///
/// Blank lines and `#` comments are skipped. The first remaining line is the
/// seed state; every later line is `<parent> <state...>`. Edges with an
/// unknown parent or a wrong-length state are logged and counted, not fatal.
fn read_edges(reader: impl BufRead) -> Result<(Tree<LqrEdge>, usize)> {
    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        records.push((line_no + 1, line.to_string()));
    }
    let mut records = records.into_iter();

    let Some((seed_line, seed_text)) = records.next() else {
        bail!("edge list has no seed state");
    };
    let seed = parse_state(seed_text.split_whitespace(), seed_line)?;
    let gain = DMatrix::zeros(1, seed.len());
    let mut tree = Tree::<LqrEdge>::new(&seed, gain).context("failed to seed tree")?;
    let mut rejected = 0usize;

    for (line_no, text) in records {
        let mut fields = text.split_whitespace();
        let parent_str = fields
            .next()
            .ok_or_else(|| anyhow::anyhow!("missing parent on line {}", line_no))?;
        let raw_parent: i64 = parent_str
            .parse()
            .with_context(|| format!("invalid parent '{}' on line {}", parent_str, line_no))?;
        let state = parse_state(fields, line_no)?;

        let result = tree.checked_parent(raw_parent).and_then(|parent| {
            let x_seq = DMatrix::from_row_slice(1, state.len(), &state);
            let u_seq = DMatrix::zeros(0, tree.ncontrols());
            let gain = DMatrix::zeros(tree.ncontrols(), tree.nstates());
            tree.add_node(parent, &state, gain, x_seq, u_seq)
        });
        match result {
            Ok(_) => {}
            Err(err @ (TreeError::InvalidParent { .. } | TreeError::StateDimension { .. })) => {
                warn!(line = line_no, %err, "edge rejected");
                rejected += 1;
            }
            Err(err) => return Err(err).context(format!("line {}", line_no)),
        }
    }

    Ok((tree, rejected))
}

fn run_stress(nodes: usize, nstates: usize, branching: usize) -> Result<()> {
    if nstates == 0 || branching == 0 {
        bail!("nstates and branching must be > 0");
    }

    let config = stress_config(nodes);
    let seed = vec![0.0; nstates];
    let mut tree = Tree::<LqrEdge>::with_config(&seed, DMatrix::zeros(1, nstates), config)?;

    let start = Instant::now();
    for i in 1..=nodes {
        let parent = NodeId::from((i - 1) / branching);
        let state = vec![i as f64; nstates];
        let x_seq = DMatrix::from_row_slice(1, nstates, &state);
        tree.add_node(parent, &state, DMatrix::zeros(1, nstates), x_seq, DMatrix::zeros(1, 1))?;
    }
    let grow_time = start.elapsed();

    let depths = depths(&tree);
    let start = Instant::now();
    for node in tree.nodes() {
        let chain = tree.climb(node.id)?;
        let decreasing = chain.windows(2).all(|pair| pair[0] > pair[1]);
        if chain.last() != Some(&tree.root()) || !decreasing {
            bail!("corrupt ancestor chain for node {}", node.id);
        }
        if chain.len() != depths[node.id.index()] + 1 {
            bail!(
                "chain length {} for node {} disagrees with depth {}",
                chain.len(),
                node.id,
                depths[node.id.index()]
            );
        }
    }
    let climb_time = start.elapsed();

    println!(
        "nodes={}\tmax_depth={}\tgrow={:.2?}\tclimb_all={:.2?}",
        tree.size(),
        depths.iter().copied().max().unwrap_or(0),
        grow_time,
        climb_time
    );

    Ok(())
}

/// Reservation for `nodes` appended nodes plus the root.
fn stress_config(nodes: usize) -> TreeConfig {
    TreeConfig::default().with_capacity(nodes.saturating_add(1))
}

/// Depth of every node in one pass over the parent column.
fn depths(tree: &Tree<LqrEdge>) -> Vec<usize> {
    let mut depths = Vec::with_capacity(tree.size());
    for parent in tree.parents() {
        let depth = parent.map_or(0, |p| depths[p.index()] + 1);
        depths.push(depth);
    }
    depths
}

fn parse_state<'a>(fields: impl Iterator<Item = &'a str>, line_no: usize) -> Result<Vec<f64>> {
    fields
        .map(|field| {
            field.parse::<f64>().with_context(|| {
                format!("invalid state component '{}' on line {}", field, line_no)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: &str = "\
# seed state
0.0 0.0

0 1.0 0.0
1 2.0 0.0
# rejected: negative parent, parent past the end, short state
-1 5.0 5.0
9 5.0 5.0
1 5.0
2 3.0 0.0
";

    #[test]
    fn test_read_edges_counts_rejections_and_keeps_growing() {
        let (tree, rejected) = read_edges(EDGES.as_bytes()).expect("edge list parses");

        assert_eq!(rejected, 3);
        assert_eq!(tree.size(), 4);
        assert_eq!(tree.parent_indices(), vec![-1, 0, 1, 2]);
        assert_eq!(&tree[NodeId::from(3)], &[3.0, 0.0]);
        assert_eq!(
            tree.climb(NodeId::from(3)).expect("exists"),
            vec![NodeId::from(3), NodeId::from(2), NodeId::from(1), NodeId::ROOT]
        );
        assert_eq!(depths(&tree), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_read_edges_requires_seed() {
        let err = read_edges("# only comments\n\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("no seed state"));
    }

    #[test]
    fn test_read_edges_reports_malformed_line() {
        let err = read_edges("0.0\n0 abc\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_stress_config_saturates() {
        assert_eq!(stress_config(10_000).capacity, 10_001);
        assert_eq!(stress_config(usize::MAX).capacity, usize::MAX);
    }

    #[test]
    fn test_parse_state() {
        let state = parse_state("1.5 -2 3e1".split_whitespace(), 1).expect("numbers");
        assert_eq!(state, vec![1.5, -2.0, 30.0]);
    }
}
