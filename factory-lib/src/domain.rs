use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::{fmt, fs};

use crate::data::Catalog;
use crate::entities::{Item, Rate, Recipe};
use crate::error::{FactoryError, FactoryResult};
use crate::traits::DataSource as _;

use petgraph::algo::is_cyclic_directed;
use petgraph::dot::{Config, Dot};
use petgraph::graph::NodeIndex;
use petgraph::prelude::*;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CraftingGraph<'data> {
    pub data: DiGraph<Node<'data>, Rate>,
    indices: HashMap<Node<'data>, NodeIndex>,
}

/// Nodes are compared and hashed by kind and name, never by address.
#[derive(Debug, Clone, Copy)]
pub enum Node<'data> {
    Item(&'data Item),
    Recipe(&'data Recipe),
}

impl<'data> Node<'data> {
    pub fn name(&self) -> &'data str {
        match *self {
            Node::Item(item) => &item.name,
            Node::Recipe(recipe) => &recipe.name,
        }
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Item(a), Node::Item(b)) => a.name == b.name,
            (Node::Recipe(a), Node::Recipe(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl Eq for Node<'_> {}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        self.name().hash(state);
    }
}

impl<'a> fmt::Display for Node<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Item(item) => {
                f.write_str(&format!("Item: {}", &item.name))?;
            }
            Node::Recipe(recipe) => {
                f.write_str(&format!("Recipe: {} ({})", &recipe.name, &recipe.machine))?;
            }
        }

        Ok(())
    }
}

/// Create a directed graph of items and recipes.
/// Each node is either item or recipe, which alternate between one another. In other words, there
/// is no node which has any neighbour with the same type as itself.
/// This works because:
/// - Item can be made from several recipes (Recipe -> Item)
/// - Item can be used in several recipes (Item -> Recipe)
/// - Recipe can use several items (Item -> Recipe)
/// - Recipe can return several items (Recipe -> Item)
///
/// Edge weights are per-minute rates at 1x clock speed:
/// - (Recipe -> Item) is how many items per minute one machine running the recipe produces.
/// - (Item -> Recipe) is how many items per minute one machine running the recipe consumes.
impl<'data> CraftingGraph<'data> {
    pub fn new() -> Self {
        Self {
            data: DiGraph::new(),
            indices: HashMap::new(),
        }
    }

    pub fn from_catalog(catalog: &'data Catalog) -> Self {
        Self::from_recipes(catalog, catalog.iter_recipes())
    }

    /// Graph restricted to the given recipes and the items they touch.
    pub fn from_recipes(
        catalog: &'data Catalog,
        recipes: impl IntoIterator<Item = &'data Recipe>,
    ) -> Self {
        let mut graph = Self::new();

        for recipe in recipes {
            let recipe_idx = graph.node_idx_or_insert(Node::Recipe(recipe));

            for output in &recipe.outputs {
                if let Some(item) = catalog.try_get_item(&output.item) {
                    let item_idx = graph.node_idx_or_insert(Node::Item(item));
                    graph.data.add_edge(recipe_idx, item_idx, output.rate);
                }
            }

            for input in &recipe.inputs {
                if let Some(item) = catalog.try_get_item(&input.item) {
                    let item_idx = graph.node_idx_or_insert(Node::Item(item));
                    graph.data.add_edge(item_idx, recipe_idx, input.rate);
                }
            }
        }

        debug!(
            nodes = graph.data.node_count(),
            edges = graph.data.edge_count(),
            "Built crafting graph"
        );

        graph
    }

    fn node_idx_or_insert(&mut self, node: Node<'data>) -> NodeIndex {
        let data = &mut self.data;
        *self
            .indices
            .entry(node)
            .or_insert_with(|| data.add_node(node))
    }

    pub fn get_node_idx(&self, target_node: Node) -> Option<NodeIndex> {
        self.indices.get(&target_node).copied()
    }

    /// Get all recipes that result in creation of this item.
    /// If the node is not an item or it doesn't exist in graph, None is returned.
    pub fn get_recipes_with_item_in_outputs(&self, node: Node) -> Option<Vec<Node<'data>>> {
        match node {
            Node::Item(_) => Some(
                self.data
                    .neighbors_directed(self.get_node_idx(node)?, Direction::Incoming)
                    .map(|idx| self.data[idx])
                    .collect(),
            ),
            Node::Recipe(_) => None,
        }
    }

    /// Get all recipes that use the item provided as ingredient.
    /// If the node is not an item or it doesn't exist in graph, None is returned.
    pub fn get_items_as_ingredients_in_recipes(&self, node: Node) -> Option<Vec<Node<'data>>> {
        match node {
            Node::Item(_) => Some(
                self.data
                    .neighbors_directed(self.get_node_idx(node)?, Direction::Outgoing)
                    .map(|idx| self.data[idx])
                    .collect(),
            ),
            Node::Recipe(_) => None,
        }
    }

    /// Whether some item is (transitively) needed to craft itself.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.data)
    }

    pub fn to_dot(&self) -> String {
        // Config::_Incomplete gives the best drawing despite being WIP
        format!(
            "{}",
            Dot::with_config(&self.data, &[Config::_Incomplete(())])
        )
    }

    pub fn save_as_svg(&self, file_name: PathBuf) -> FactoryResult<()> {
        let dot = self.to_dot();
        let mut cmd = Command::new("dot")
            .arg("-Tsvg")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        {
            let mut stdin = cmd.stdin.take().ok_or(FactoryError::CommandSpawn(
                "Failed to take stdin".to_string(),
            ))?;

            stdin.write_all(dot.as_bytes())?;
        }
        let output = cmd.wait_with_output()?;

        if !output.stderr.is_empty() {
            tracing::warn!("dot stderr: {}", std::str::from_utf8(&output.stderr)?);
        }

        let mut file = fs::File::create(&file_name)?;
        file.write_all(&output.stdout)?;
        debug!("Saved crafting graph to {}", file_name.display());

        Ok(())
    }
}

impl<'data> Default for CraftingGraph<'data> {
    fn default() -> Self {
        Self::new()
    }
}
