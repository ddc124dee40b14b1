use std::fmt;

use ndarray::Array2;

use crate::error::TopologyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Unassigned,
    Creator(usize),
    Destroyer(usize),
    Essential,
}

/// Index-level persistence result for a complex of `size` positions.
///
/// A partial matching of creator positions to later destroyer positions plus
/// the positions of essential (never destroyed) classes. Every position takes
/// part in at most one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistencePairing {
    pairs: Vec<(usize, usize)>,
    essential: Vec<usize>,
    roles: Vec<Role>,
}

impl PersistencePairing {
    pub fn new(size: usize) -> Self {
        PersistencePairing {
            pairs: Vec::new(),
            essential: Vec::new(),
            roles: vec![Role::Unassigned; size],
        }
    }

    pub fn add_pair(&mut self, creator: usize, destroyer: usize) -> anyhow::Result<()> {
        if creator >= destroyer {
            return Err(TopologyError::invalid(
                destroyer,
                format!("destroyer does not follow its creator at position {}", creator),
            )
            .into());
        }
        self.check_unassigned(creator)?;
        self.check_unassigned(destroyer)?;

        self.roles[creator] = Role::Creator(destroyer);
        self.roles[destroyer] = Role::Destroyer(creator);
        self.pairs.push((creator, destroyer));
        Ok(())
    }

    pub fn add_essential(&mut self, position: usize) -> anyhow::Result<()> {
        self.check_unassigned(position)?;
        self.roles[position] = Role::Essential;
        self.essential.push(position);
        Ok(())
    }

    fn check_unassigned(&self, position: usize) -> anyhow::Result<()> {
        match self.roles.get(position) {
            None => Err(TopologyError::invalid(
                position,
                format!("position exceeds pairing size {}", self.roles.len()),
            )
            .into()),
            Some(Role::Unassigned) => Ok(()),
            Some(_) => Err(TopologyError::invalid(position, "position is already paired").into()),
        }
    }

    /// `(creator, destroyer)` pairs in insertion order.
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub fn essential(&self) -> &[usize] {
        &self.essential
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of positions of the underlying complex.
    pub fn size(&self) -> usize {
        self.roles.len()
    }

    /// The position matched with `position`, if any.
    pub fn partner(&self, position: usize) -> Option<usize> {
        match self.roles.get(position) {
            Some(&Role::Creator(other)) | Some(&Role::Destroyer(other)) => Some(other),
            _ => None,
        }
    }

    pub fn is_essential(&self, position: usize) -> bool {
        matches!(self.roles.get(position), Some(Role::Essential))
    }

    pub fn is_creator(&self, position: usize) -> bool {
        matches!(
            self.roles.get(position),
            Some(Role::Creator(_)) | Some(Role::Essential)
        )
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (usize, usize)> {
        self.pairs.iter()
    }

    /// Pairs as a `k x 2` array of `(creator, destroyer)` rows.
    pub fn to_array(&self) -> Array2<usize> {
        let mut array = Array2::zeros((self.pairs.len(), 2));
        for (mut row, &(creator, destroyer)) in array.rows_mut().into_iter().zip(self.pairs.iter()) {
            row[0] = creator;
            row[1] = destroyer;
        }
        array
    }
}

impl<'a> IntoIterator for &'a PersistencePairing {
    type Item = &'a (usize, usize);
    type IntoIter = std::slice::Iter<'a, (usize, usize)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

impl fmt::Display for PersistencePairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (creator, destroyer) in &self.pairs {
            writeln!(f, "{}\t{}", creator, destroyer)?;
        }
        for position in &self.essential {
            writeln!(f, "{}\tinf", position)?;
        }
        Ok(())
    }
}
