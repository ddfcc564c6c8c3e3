//! FAQ accordion: at most one open item per list.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FaqItem {
    group: Option<usize>,
    open: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FaqAccordion {
    items: Vec<FaqItem>,
}

impl FaqAccordion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an item and returns its index. Items without a group only
    /// ever affect themselves.
    pub fn add_item(&mut self, group: Option<usize>, open: bool) -> usize {
        self.items.push(FaqItem { group, open });
        self.items.len() - 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.items.get(index).map_or(false, |item| item.open)
    }

    /// Flips `index` and closes its open siblings. Returns every item whose
    /// state changed, with the new state.
    pub fn toggle(&mut self, index: usize) -> Vec<(usize, bool)> {
        let Some(target) = self.items.get(index).copied() else {
            return Vec::new();
        };
        let mut changes = Vec::new();
        if let Some(group) = target.group {
            for (other, item) in self.items.iter_mut().enumerate() {
                if other != index && item.open && item.group == Some(group) {
                    item.open = false;
                    changes.push((other, false));
                }
            }
        }
        self.items[index].open = !target.open;
        changes.push((index, !target.open));
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_an_item_closes_its_siblings_only() {
        let mut faq = FaqAccordion::new();
        let a = faq.add_item(Some(0), false);
        let b = faq.add_item(Some(0), true);
        let c = faq.add_item(Some(1), true);

        let changes = faq.toggle(a);
        assert_eq!(changes, vec![(b, false), (a, true)]);
        assert!(faq.is_open(a));
        assert!(!faq.is_open(b));
        assert!(faq.is_open(c));
    }

    #[test]
    fn clicking_an_open_item_closes_it() {
        let mut faq = FaqAccordion::new();
        let a = faq.add_item(Some(0), false);
        faq.toggle(a);
        assert_eq!(faq.toggle(a), vec![(a, false)]);
        assert!(!faq.is_open(a));
    }

    #[test]
    fn ungrouped_items_toggle_independently() {
        let mut faq = FaqAccordion::new();
        let a = faq.add_item(None, true);
        let b = faq.add_item(None, false);
        faq.toggle(b);
        assert!(faq.is_open(a));
        assert!(faq.is_open(b));
    }

    #[test]
    fn unknown_index_is_ignored() {
        let mut faq = FaqAccordion::new();
        assert!(faq.toggle(3).is_empty());
        assert!(!faq.is_open(3));
    }
}
