//! Ordered equations with cached partials, name substitutions and combos

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::definition::Definition;
use crate::equation::{Equation, Evaluable, NativeEquation};
use crate::error::{Result, SolveError};
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, Expr, parse, parse_equation_limited};

/// A system of equations, each differentiated once when it is added
///
/// # Example
/// ```
/// use symb_propagate::EquationSet;
///
/// let mut set = EquationSet::new();
/// set.add_equation("A = pi*r**2").unwrap();
/// set.add_equation("V = A*h").unwrap();
/// set.add_combo("area", [0]).unwrap();
///
/// assert_eq!(set.variables(None).unwrap().len(), 4);
/// assert_eq!(set.equations(Some("area")).unwrap().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct EquationSet {
    equations: Vec<Equation>,
    combos: BTreeMap<String, Vec<usize>>,
    names: BTreeMap<String, Expr>,
    max_depth: usize,
    max_nodes: usize,
}

impl Default for EquationSet {
    fn default() -> Self {
        Self {
            equations: Vec::new(),
            combos: BTreeMap::new(),
            names: BTreeMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

impl EquationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every equation of a definition text into a new set
    pub fn from_definition(text: &str) -> Result<Self> {
        let mut set = Self::new();
        set.load(text)?;
        Ok(set)
    }

    /// Set the AST depth and node-count limits used for subsequent equations
    pub fn with_limits(mut self, max_depth: usize, max_nodes: usize) -> Self {
        self.max_depth = max_depth;
        self.max_nodes = max_nodes;
        self
    }

    /// Replace `original` by the expression `replacement` in every equation
    /// added by text from now on
    pub fn with_name(mut self, original: impl Into<String>, replacement: &str) -> Result<Self> {
        self.names.insert(original.into(), parse(replacement)?);
        Ok(self)
    }

    /// Parse, substitute names and differentiate an equation, returning its index
    pub fn add_equation(&mut self, text: &str) -> Result<usize> {
        let expr = parse_equation_limited(text, self.max_depth, self.max_nodes)?
            .substitute(&self.names);
        let equation = Equation::from_expr(text, expr);
        debug!(
            index = self.equations.len(),
            equation = %equation,
            variables = equation.partials().len(),
            "added equation"
        );
        self.equations.push(equation);
        Ok(self.equations.len() - 1)
    }

    /// Append a function-backed equation, returning its index
    pub fn add_native(&mut self, native: NativeEquation) -> Result<usize> {
        let equation = Equation::from_native(native)?;
        debug!(index = self.equations.len(), label = equation.label(), "added native equation");
        self.equations.push(equation);
        Ok(self.equations.len() - 1)
    }

    /// Register a named subset of equation indices
    pub fn add_combo<I>(&mut self, name: impl Into<String>, indices: I) -> Result<()>
    where
        I: IntoIterator<Item = usize>,
    {
        let name = name.into();
        let indices: Vec<usize> = indices.into_iter().collect();
        if let Some(&index) = indices.iter().find(|&&i| i >= self.equations.len()) {
            return Err(SolveError::InvalidCombo {
                name,
                index,
                len: self.equations.len(),
            });
        }
        self.combos.insert(name, indices);
        Ok(())
    }

    /// Append the equations, names and combos of a definition text
    ///
    /// Names apply to every equation of the definition regardless of where
    /// the `[names]` section appears. Combo indices are relative to the
    /// equations of this definition.
    pub fn load(&mut self, text: &str) -> Result<()> {
        let def = Definition::parse(text)?;
        let offset = self.equations.len();

        // Leave the set untouched on failure
        let mut staged = self.clone();
        staged.names.extend(def.names);
        for eq in &def.equations {
            staged.add_equation(eq)?;
        }
        for (name, indices) in def.combos {
            staged.add_combo(name, indices.into_iter().map(|i| i + offset))?;
        }
        debug!(
            equations = def.equations.len(),
            combos = staged.combos.len(),
            "loaded definition"
        );
        *self = staged;
        Ok(())
    }

    /// All equations, or the combo's equations in combo order
    pub fn equations(&self, combo: Option<&str>) -> Result<Vec<&Equation>> {
        match combo {
            None => Ok(self.equations.iter().collect()),
            Some(name) => Ok(self
                .combo(name)?
                .iter()
                .filter_map(|&i| self.equations.get(i))
                .collect()),
        }
    }

    /// Partial-derivative maps of the selected equations
    pub fn partials(&self, combo: Option<&str>) -> Result<Vec<&BTreeMap<String, Evaluable>>> {
        Ok(self
            .equations(combo)?
            .into_iter()
            .map(Equation::partials)
            .collect())
    }

    /// Union of the free variables of the selected equations
    pub fn variables(&self, combo: Option<&str>) -> Result<BTreeSet<String>> {
        Ok(self
            .equations(combo)?
            .into_iter()
            .flat_map(|eq| eq.variables().map(str::to_string))
            .collect())
    }

    pub fn get(&self, index: usize) -> Option<&Equation> {
        self.equations.get(index)
    }

    pub fn combo(&self, name: &str) -> Result<&[usize]> {
        self.combos
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| SolveError::UnknownCombo {
                name: name.to_string(),
            })
    }

    pub fn combo_names(&self) -> impl Iterator<Item = &str> {
        self.combos.keys().map(String::as_str)
    }

    pub fn names(&self) -> &BTreeMap<String, Expr> {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }
}
