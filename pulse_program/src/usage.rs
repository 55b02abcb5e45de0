use std::collections::{BTreeMap, BTreeSet};
use crate::family::Family;

/// per-family index sets as they are collected line by line. A family only gets an entry
/// once an index is inserted for it.
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct IndexSets {
    sets:BTreeMap<Family,BTreeSet<u32>>,
}

impl IndexSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self,family:Family,index:u32) {
        self.sets.entry(family).or_default().insert(index);
    }

    pub fn get(&self,family:Family) -> Option<&BTreeSet<u32>> {
        self.sets.get(&family)
    }

    /// remove what quoted lines merely declare from what executable lines use
    pub fn reconcile(&self,declared:&IndexSets) -> UsedParameterSet {
        UsedParameterSet { sets:self.sets.clone() }.subtract(declared)
    }
}

impl FromIterator<(Family,u32)> for IndexSets {
    fn from_iter<T: IntoIterator<Item=(Family,u32)>>(iter: T) -> Self {
        let mut sets = IndexSets::new();
        iter.into_iter().for_each(|(family,index)| sets.insert(family,index));
        sets
    }
}

/// the parameters a pulse program really depends on. Families without any index are
/// absent, never present with an empty set.
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct UsedParameterSet {
    sets:BTreeMap<Family,BTreeSet<u32>>,
}

impl UsedParameterSet {
    pub fn subtract(&self,declared:&IndexSets) -> Self {
        let mut sets = self.sets.clone();
        for (family,indices) in declared.sets.iter() {
            if let Some(used) = sets.get_mut(family) {
                indices.iter().for_each(|index| { used.remove(index); });
            }
        }
        sets.retain(|_,indices| !indices.is_empty());
        Self { sets }
    }

    pub fn contains(&self,family:Family) -> bool {
        self.sets.contains_key(&family)
    }

    pub fn get(&self,family:Family) -> Option<&BTreeSet<u32>> {
        self.sets.get(&family)
    }

    /// ascending; empty when the family is unused
    pub fn indices(&self,family:Family) -> Vec<u32> {
        self.sets.get(&family).map(|s| s.iter().copied().collect()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_indices_are_removed(){
        let usage:IndexSets = [(Family::P,1),(Family::P,2),(Family::P,3)].into_iter().collect();
        let declared:IndexSets = [(Family::P,2)].into_iter().collect();
        let used = usage.reconcile(&declared);
        assert_eq!(used.indices(Family::P),vec![1,3]);
        // idempotent
        assert_eq!(used.subtract(&declared),used);
    }

    #[test]
    fn emptied_families_are_dropped(){
        let usage:IndexSets = [(Family::D,11),(Family::Cnst,2)].into_iter().collect();
        let declared:IndexSets = [(Family::D,11),(Family::Gp,1)].into_iter().collect();
        let used = usage.reconcile(&declared);
        assert!(!used.contains(Family::D));
        assert!(!used.contains(Family::Gp));
        assert!(used.contains(Family::Cnst));
        assert_eq!(used.get(Family::D),None);
    }

    #[test]
    fn indices_are_sorted(){
        let usage:IndexSets = [(Family::Cnst,10),(Family::Cnst,4),(Family::Cnst,10)].into_iter().collect();
        assert_eq!(usage.reconcile(&IndexSets::new()).indices(Family::Cnst),vec![4,10]);
    }
}
