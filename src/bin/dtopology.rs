use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use dtopology::{split_facets, Catalogue, DTopologyConfig, DialecticTree, ParentLookup};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("dtopology=info".parse()?),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut dictionary: Option<PathBuf> = None;
    let mut graph: Option<PathBuf> = None;
    let mut catalogue: Option<PathBuf> = None;
    let mut query: Option<String> = None;
    let mut top_n: Option<usize> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        let value = || args.get(i + 1).cloned().ok_or_else(|| anyhow!("{} requires a value", args[i]));
        match args[i].as_str() {
            "--config" | "-c" => {
                config_path = Some(PathBuf::from(value()?));
                i += 1;
            }
            "--dict" | "-d" => {
                dictionary = Some(PathBuf::from(value()?));
                i += 1;
            }
            "--graph" | "-g" => {
                graph = Some(PathBuf::from(value()?));
                i += 1;
            }
            "--catalogue" => {
                catalogue = Some(PathBuf::from(value()?));
                i += 1;
            }
            "--query" | "-q" => {
                query = Some(value()?);
                i += 1;
            }
            "-n" => {
                let n = value()?;
                top_n = Some(n.parse().with_context(|| format!("invalid -n value {:?}", n))?);
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let Some((command, rest)) = positional.split_first() else {
        print_help();
        return Ok(());
    };

    let mut config = DTopologyConfig::load(config_path.as_deref())?;
    if let Some(path) = dictionary {
        config.dictionary_path = path;
    }
    if let Some(path) = graph {
        config.graph_path = path;
    }
    if let Some(path) = catalogue {
        config.catalogue_path = Some(path);
    }

    let tree = DialecticTree::load(&config)?;

    match (command.as_str(), rest) {
        ("check", []) => {
            let stats = tree.index().stats();
            println!(
                "{} concepts, {} edges, max sn {}",
                stats.total_concepts,
                tree.graph().edge_count(),
                stats.max_sn
            );
            let issues = tree.check()?;
            if issues.is_empty() {
                println!("Taxonomy is well-formed");
            } else {
                println!("{}", serde_json::to_string_pretty(&issues)?);
                std::process::exit(1);
            }
        }
        ("parent", [name]) => match tree.navigator().definitional_parent(name)? {
            ParentLookup::Found(parent) => println!("{}", parent),
            ParentLookup::IsRoot => println!("{} is the root", name),
            ParentLookup::Missing => bail!("{} has no definitional parent", name),
            ParentLookup::Ambiguous(sources) => {
                bail!("{} has {} definitional parents: {}", name, sources.len(), sources.join(", "))
            }
        },
        ("nca", [a, b]) => {
            println!("{}", tree.navigator().nearest_common_ancestor(a, b)?);
        }
        ("descendant", [d, a]) => {
            println!("{}", tree.navigator().is_descendant(d, a)?);
        }
        ("nearest", [a, b, reference]) => {
            println!("{}", tree.concept_comparator().nearest_of(a, b, reference)?);
        }
        ("select", []) => {
            let query = query.ok_or_else(|| anyhow!("select requires --query a,b,..."))?;
            let request = split_facets(&query);
            let path = config
                .catalogue_path
                .clone()
                .ok_or_else(|| anyhow!("select requires --catalogue or catalogue_path"))?;
            let catalogue = Catalogue::from_file(&path)?;

            match catalogue.arity() {
                Some(arity) if arity != request.len() => {
                    bail!("query has {} facets but the catalogue has {}", request.len(), arity)
                }
                None if !catalogue.is_empty() => bail!("catalogue entries disagree on arity"),
                _ => {}
            }

            let n = top_n.unwrap_or(config.default_top_n);
            let selected = tree.ranker().top_n(&catalogue.entries, &request, n)?;
            println!("{}", serde_json::to_string_pretty(&selected)?);
        }
        (other, _) => {
            eprintln!("Unknown command or wrong arguments: {} {:?}", other, rest);
            print_help();
            std::process::exit(2);
        }
    }

    Ok(())
}

fn print_help() {
    println!(r#"
Dialectical tree navigation and taxonomy-based selection

USAGE:
    dtopology [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
    check                       Validate opposites and definitional edges
    parent <CONCEPT>            Definitional parent of a concept
    nca <A> <B>                 Nearest common ancestor
    descendant <D> <A>          Whether D lies below (or is) A
    nearest <A> <B> <REF>       Which of A, B is nearer to REF
    select --query <FACETS>     Top-N catalogue entries nearest to the query

OPTIONS:
    -c, --config <FILE>         Config file (default: ./dtopology.toml if present)
    -d, --dict <FILE>           Concept dictionary (name<TAB>opposite<TAB>sn)
    -g, --graph <FILE>          Definitional edges (subject<TAB>predicate<TAB>object)
    --catalogue <FILE>          JSON catalogue of labelled attribute vectors
    -q, --query <FACETS>        Comma-separated facets, "nil" for any
    -n <N>                      Selection size (default: 3)
    -h, --help                  Print this help

EXAMPLES:
    dtopology nca становление иное_становлению

    dtopology --catalogue data/catalogue_7411.json select -n 3 \
        --query группа_7411_ОК_ЕСКД,фрезерование,четырехугольник,прямой_угол,l_до_3в_включ,с_отверстиями_круглыми,без_резьбы

ENVIRONMENT:
    DTOPOLOGY_*                 Override any config key, e.g. DTOPOLOGY_MAX_WALK_DEPTH
    RUST_LOG                    Log filter (dtopology=info is always added)
"#);
}
