//! Dependency ordering of generators.

use crate::CycleError;

/// Order nodes so that every node comes after all of its dependencies.
///
/// `dependencies[i]` lists the indices node `i` must run after. Roots are
/// visited in index order and dependencies in declaration order, so the
/// result is deterministic. A node reached again while it is still on the
/// current depth-first path closes a cycle.
pub fn execution_order(
    names: &[&str],
    dependencies: &[Vec<usize>],
) -> Result<Vec<usize>, CycleError> {
    let mut state = Walk {
        names,
        dependencies,
        ordered: Vec::with_capacity(names.len()),
        done: vec![false; names.len()],
        path: Vec::new(),
    };
    for node in 0..names.len() {
        state.visit(node)?;
    }
    Ok(state.ordered)
}

struct Walk<'a> {
    names: &'a [&'a str],
    dependencies: &'a [Vec<usize>],
    ordered: Vec<usize>,
    done: Vec<bool>,
    /// Nodes on the current path, outermost first.
    path: Vec<usize>,
}

impl Walk<'_> {
    fn visit(&mut self, node: usize) -> Result<(), CycleError> {
        if self.done[node] {
            return Ok(());
        }
        if let Some(pos) = self.path.iter().position(|&n| n == node) {
            let mut cycle: Vec<String> = self.path[pos..]
                .iter()
                .map(|&n| self.names[n].to_string())
                .collect();
            cycle.push(self.names[node].to_string());
            return Err(CycleError { cycle });
        }

        self.path.push(node);
        if let Some(deps) = self.dependencies.get(node) {
            for &dep in deps {
                self.visit(dep)?;
            }
        }
        self.path.pop();

        self.done[node] = true;
        self.ordered.push(node);
        Ok(())
    }
}
