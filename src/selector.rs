use crate::album::MediaItem;
use crate::error::{Error, Result};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks random photos out of a listing.
///
/// The random source is seeded once and owned by the selector. Picks are
/// independent, so the same item may be returned more than once.
pub struct RandomSelector<R: Rng> {
    rng: R,
}

impl RandomSelector<StdRng> {
    pub fn from_entropy() -> Self {
        RandomSelector::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSelector<R> {
    pub fn new(rng: R) -> Self {
        RandomSelector { rng }
    }

    /// Return a photo item from `items`.
    ///
    /// Starts at a random index and scans forward, wrapping around, until
    /// a photo is found. Each index is visited at most once, so a listing
    /// without any photo fails with `EmptyListing` instead of spinning.
    pub fn pick<'a>(&mut self, items: &'a [MediaItem]) -> Result<&'a MediaItem> {
        if items.is_empty() {
            return Err(Error::EmptyListing { items: 0 });
        }

        let start = self.rng.gen_range(0, items.len());
        (0..items.len())
            .map(|offset| &items[(start + offset) % items.len()])
            .inspect(|item| {
                if !item.is_photo() {
                    debug!("Skipping non-photo item {}", item.id);
                }
            })
            .find(|item| item.is_photo())
            .ok_or(Error::EmptyListing { items: items.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::album::MediaType;
    use crate::test_helpers::{item, photo, video};
    use std::collections::HashSet;

    fn selector(seed: u64) -> RandomSelector<StdRng> {
        RandomSelector::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_pick_returns_photo() {
        let items = vec![
            video("v1"),
            photo("p1"),
            item("n1", None),
            video("v2"),
            photo("p2"),
            item("n2", None),
        ];
        let mut selector = selector(1);
        for _ in 0..200 {
            let picked = selector.pick(&items).unwrap();
            assert_eq!(Some(MediaType::PHOTO), picked.media_type);
        }
    }

    #[test]
    fn test_pick_wraps_around() {
        // The only photo sits before every other start index
        let items = vec![photo("p"), video("v1"), video("v2"), video("v3")];
        let mut selector = selector(7);
        for _ in 0..50 {
            assert_eq!("p", selector.pick(&items).unwrap().id);
        }
    }

    #[test]
    fn test_pick_is_random() {
        let items: Vec<_> = (0..10).map(|i| photo(&i.to_string())).collect();
        let mut selector = selector(42);
        let picked: HashSet<_> = (0..100)
            .map(|_| selector.pick(&items).unwrap().id.clone())
            .collect();
        // May repeat, but must not stick to a single item
        assert!(picked.len() > 1);
    }

    #[test]
    fn test_pick_without_photos_is_guarded() {
        let items = vec![video("v1"), item("n1", None), video("v2")];
        match selector(3).pick(&items) {
            Err(Error::EmptyListing { items }) => assert_eq!(3, items),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_pick_empty() {
        match RandomSelector::from_entropy().pick(&[]) {
            Err(Error::EmptyListing { items }) => assert_eq!(0, items),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
