//! Evolution chain traversal.
//!
//! The API returns a tree. Only the leftmost path is kept: at every node the
//! first entry of `evolves_to` is followed and its siblings are ignored, so
//! branching families (e.g. eevee) show a single line.

use serde::Deserialize;
use tracing::warn;

use crate::state::EvolutionNode;

/// Upper bound on emitted stages for malformed chains.
pub const MAX_EVOLUTION_DEPTH: usize = 16;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChainLink {
    pub species: SpeciesRef,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SpeciesRef {
    pub name: String,
    pub url: String,
}

pub fn first_branch(root: &ChainLink) -> Vec<EvolutionNode> {
    let mut nodes = Vec::new();
    let mut current = Some(root);
    while let Some(link) = current {
        if nodes.len() >= MAX_EVOLUTION_DEPTH {
            break;
        }
        let species_id = species_id_from_url(&link.species.url).unwrap_or_else(|| {
            warn!(species = %link.species.name, url = %link.species.url, "species url has no id");
            0
        });
        nodes.push(EvolutionNode {
            species_name: link.species.name.clone(),
            species_id,
        });
        current = link.evolves_to.first();
    }
    nodes
}

/// `https://pokeapi.co/api/v2/pokemon-species/133/` → `133`.
pub fn species_id_from_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn link(name: &str, id: u32, evolves_to: Vec<ChainLink>) -> ChainLink {
        ChainLink {
            species: SpeciesRef {
                name: name.to_string(),
                url: format!("https://pokeapi.co/api/v2/pokemon-species/{id}/"),
            },
            evolves_to,
        }
    }

    fn names(nodes: &[EvolutionNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.species_name.as_str()).collect()
    }

    #[test]
    fn test_linear_chain() {
        let chain = link(
            "bulbasaur",
            1,
            vec![link("ivysaur", 2, vec![link("venusaur", 3, vec![])])],
        );
        let nodes = first_branch(&chain);
        assert_eq!(names(&nodes), vec!["bulbasaur", "ivysaur", "venusaur"]);
        assert_eq!(
            nodes.iter().map(|node| node.species_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_branching_chain_keeps_first_branch() {
        let chain = link(
            "eevee",
            133,
            vec![link("vaporeon", 134, vec![]), link("jolteon", 135, vec![])],
        );
        let nodes = first_branch(&chain);
        assert_eq!(names(&nodes), vec!["eevee", "vaporeon"]);
    }

    #[test]
    fn test_single_stage() {
        let nodes = first_branch(&link("tauros", 128, vec![]));
        assert_eq!(names(&nodes), vec!["tauros"]);
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut chain = link("end", 1, vec![]);
        for i in 0..40 {
            chain = link(&format!("stage-{i}"), i + 2, vec![chain]);
        }
        assert_eq!(first_branch(&chain).len(), MAX_EVOLUTION_DEPTH);
    }

    #[test]
    fn test_malformed_species_url_yields_zero_id() {
        let mut chain = link("porygon", 137, vec![]);
        chain.species.url = "https://pokeapi.co/api/v2/pokemon-species/".into();
        let nodes = first_branch(&chain);
        assert_eq!(nodes[0].species_name, "porygon");
        assert_eq!(nodes[0].species_id, 0);
    }

    #[test]
    fn test_species_id_from_url() {
        assert_eq!(
            species_id_from_url("https://pokeapi.co/api/v2/pokemon-species/133/"),
            Some(133)
        );
        assert_eq!(
            species_id_from_url("https://pokeapi.co/api/v2/pokemon-species/25"),
            Some(25)
        );
        assert_eq!(species_id_from_url("not-a-url"), None);
    }

    #[test]
    fn test_deserializes_api_payload() {
        let json = r#"{
            "species": {"name": "pichu", "url": "https://pokeapi.co/api/v2/pokemon-species/172/"},
            "evolves_to": [{
                "species": {"name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon-species/25/"},
                "evolves_to": []
            }]
        }"#;
        let chain: ChainLink = serde_json::from_str(json).unwrap();
        assert_eq!(names(&first_branch(&chain)), vec!["pichu", "pikachu"]);
    }
}
