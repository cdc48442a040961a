/// Two per-side values (characters or players) compared up to a left/right swap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pairing {
    pub first: Option<String>,
    pub second: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Direct,
    Swapped,
}

fn agrees(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}

fn hits(a: &Option<String>, b: &Option<String>) -> usize {
    match (a, b) {
        (Some(x), Some(y)) if x == y => 1,
        _ => 0,
    }
}

impl Pairing {
    pub fn new(first: Option<String>, second: Option<String>) -> Self {
        Self { first, second }
    }

    pub fn is_complete(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }

    pub fn swapped(&self) -> Self {
        Self::new(self.second.clone(), self.first.clone())
    }

    pub fn aligned(&self, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Direct => self.clone(),
            Orientation::Swapped => self.swapped(),
        }
    }

    /// How `self` lines up against `reference`, treating absent sides as
    /// wildcards. `None` when neither orientation agrees.
    pub fn orientation_against(&self, reference: &Pairing) -> Option<Orientation> {
        let direct_ok = agrees(&self.first, &reference.first) && agrees(&self.second, &reference.second);
        let swap_ok = agrees(&self.first, &reference.second) && agrees(&self.second, &reference.first);

        match (direct_ok, swap_ok) {
            (true, true) => {
                let direct = hits(&self.first, &reference.first) + hits(&self.second, &reference.second);
                let swap = hits(&self.first, &reference.second) + hits(&self.second, &reference.first);
                if swap > direct {
                    Some(Orientation::Swapped)
                } else {
                    Some(Orientation::Direct)
                }
            }
            (true, false) => Some(Orientation::Direct),
            (false, true) => Some(Orientation::Swapped),
            (false, false) => None,
        }
    }

    /// Fills absent sides from `other` (already aligned).
    pub fn fill_from(&mut self, other: &Pairing) {
        if self.first.is_none() {
            self.first = other.first.clone();
        }
        if self.second.is_none() {
            self.second = other.second.clone();
        }
    }

    /// Both pairings complete and differing on each side. `next` must already
    /// be aligned to `self`.
    pub fn changed_on_both_sides(&self, next: &Pairing) -> bool {
        self.is_complete() && next.is_complete() && self.first != next.first && self.second != next.second
    }
}
