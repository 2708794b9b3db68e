//! Problem definition - nodes, elements and boundary values

use std::collections::{BTreeMap, BTreeSet};

use crate::analysis::SolverOptions;
use crate::dof::{Dof, Index, NodalValue, Node};
use crate::elements::Element;
use crate::error::{BvpError, BvpResult};
use crate::layout::EqLayout;
use crate::loads::ElementLoad;
use crate::results::ProblemResult;
use crate::solver::{EquationSolver, LinearSolver};
use crate::transform::{InclinedSupport, Transformer};

/// A linear boundary value problem
///
/// Elements keep their own copy of the node coordinates; the node table is used to validate
/// references to node ids.
#[derive(Debug, Default)]
pub struct Problem {
    nodes: BTreeMap<String, Node>,
    elements: Vec<Box<dyn Element>>,
    dirichlet: Vec<NodalValue>,
    neumann: Vec<NodalValue>,
    transformers: Vec<Box<dyn Transformer>>,
}

impl Problem {
    /// Create an empty problem
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Building
    // ========================

    /// Add a node; ids must be unique
    pub fn add_node(&mut self, node: Node) -> BvpResult<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(BvpError::DuplicateName(node.id));
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> BvpResult<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| BvpError::NodeNotFound(id.to_string()))
    }

    /// Add an element; its id must be unique and all nodes it connects must exist
    pub fn add_element(&mut self, element: impl Element + 'static) -> BvpResult<()> {
        if self.elements.iter().any(|e| e.id() == element.id()) {
            return Err(BvpError::DuplicateName(element.id().to_string()));
        }

        let mut indices = BTreeSet::new();
        element.indices(&mut indices);

        if let Some(missing) = indices.iter().find(|i| !self.nodes.contains_key(&i.node)) {
            return Err(BvpError::NodeNotFound(missing.node.clone()));
        }

        self.elements.push(Box::new(element));
        Ok(())
    }

    /// Look up an element by id
    pub fn element(&self, id: &str) -> BvpResult<&dyn Element> {
        self.elements
            .iter()
            .find(|e| e.id() == id)
            .map(|e| e.as_ref())
            .ok_or_else(|| BvpError::ElementNotFound(id.to_string()))
    }

    /// Route a load to an element
    pub fn add_element_load(&mut self, id: &str, load: ElementLoad) -> BvpResult<()> {
        let element = self
            .elements
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| BvpError::ElementNotFound(id.to_string()))?;

        if !element.add_load(load) {
            return Err(BvpError::InvalidInput(format!(
                "element '{id}' can't carry {load:?}"
            )));
        }
        Ok(())
    }

    /// Remove a load from an element
    pub fn remove_element_load(&mut self, id: &str, load: &ElementLoad) -> BvpResult<()> {
        let element = self
            .elements
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| BvpError::ElementNotFound(id.to_string()))?;

        element.remove_load(load);
        Ok(())
    }

    /// Prescribe a primary value
    ///
    /// Duplicates and values on indices no element touches are reported when solving.
    pub fn add_dirichlet(&mut self, node: &str, dof: Dof, value: f64) -> BvpResult<()> {
        self.node(node)?;
        self.dirichlet.push(NodalValue::new(node, dof, value));
        Ok(())
    }

    /// Add a nodal load; several loads on the same index add up
    pub fn add_neumann(&mut self, node: &str, dof: Dof, value: f64) -> BvpResult<()> {
        self.node(node)?;
        self.neumann.push(NodalValue::new(node, dof, value));
        Ok(())
    }

    /// Support `node` on a plane inclined by `angle` (radians)
    ///
    /// The displacement pair `(from, to)` is rotated by `angle` and the rotated `to` direction
    /// is fixed.
    pub fn add_inclined_support(&mut self, node: &str, from: Dof, to: Dof, angle: f64) -> BvpResult<()> {
        self.node(node)?;
        let (support, bc) = InclinedSupport::new(Index::new(node, from), Index::new(node, to), angle)?;
        self.transformers.push(Box::new(support));
        self.dirichlet.push(bc);
        Ok(())
    }

    /// Register any other change of basis
    pub fn add_transformer(&mut self, transformer: impl Transformer + 'static) {
        self.transformers.push(Box::new(transformer));
    }

    // ========================
    // Access
    // ========================

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn elements(&self) -> impl Iterator<Item = &dyn Element> {
        self.elements.iter().map(|e| -> &dyn Element { e.as_ref() })
    }

    pub fn dirichlet(&self) -> &[NodalValue] {
        &self.dirichlet
    }

    pub fn neumann(&self) -> &[NodalValue] {
        &self.neumann
    }

    pub fn transformers(&self) -> impl Iterator<Item = &dyn Transformer> {
        self.transformers.iter().map(|t| -> &dyn Transformer { t.as_ref() })
    }

    // ========================
    // Solution
    // ========================

    /// Build the layout, assemble and solve the problem
    pub fn solve(&self, strategy: &dyn EquationSolver, options: SolverOptions) -> BvpResult<ProblemResult<'_>> {
        let layout = EqLayout::from_problem(self)?;
        let solution = LinearSolver::new(options).solve(self, &layout, strategy)?;
        ProblemResult::new(self, layout, solution)
    }
}
