use crate::role::Role;

/// Anything holding exactly one role that may be exchanged with another holder.
pub trait Swappable {
    fn name(&self) -> String;
    fn role(&self) -> Role;
    fn set_role(&mut self, role: Role);

    // both roles are read before either is written
    fn exchange(&mut self, other: &mut dyn Swappable) {
        let mine = self.role();
        let theirs = other.role();
        self.set_role(theirs);
        other.set_role(mine);
    }
}

/// Anything holding a coin balance. Balances never go below zero.
pub trait CoinOwner {
    fn coins(&self) -> u64;
    fn credit(&mut self, amount: u64);

    /// Removes up to `amount` and returns what was actually removed.
    fn debit(&mut self, amount: u64) -> u64;

    /// Moves up to `amount` to `to`. A shortfall is simply not collected.
    fn pay(&mut self, to: &mut dyn CoinOwner, amount: u64) -> u64 {
        let taken = self.debit(amount);
        to.credit(taken);
        taken
    }
}

/// Address of a swappable: a seat at the table or a face-down table card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityId {
    Player(usize),
    Table(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub(crate) name: String,
    pub(crate) coins: u64,
    pub(crate) role: Role,
    // turn on which the role was last shown to everyone
    pub(crate) last_revealed: Option<u32>,
}

impl Player {
    pub fn new(name: &str, role: Role, coins: u64) -> Self {
        Self {
            name: name.to_string(),
            coins,
            role,
            last_revealed: None,
        }
    }

    pub fn name_str(&self) -> &str {
        &self.name
    }

    pub fn last_revealed(&self) -> Option<u32> {
        self.last_revealed
    }

    pub fn reveal(&mut self, turn: u32) {
        self.last_revealed = Some(turn);
    }

    pub fn revealed_on(&self, turn: u32) -> bool {
        self.last_revealed == Some(turn)
    }
}

impl Swappable for Player {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn role(&self) -> Role {
        self.role
    }

    fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}

impl CoinOwner for Player {
    fn coins(&self) -> u64 {
        self.coins
    }

    fn credit(&mut self, amount: u64) {
        self.coins += amount;
    }

    fn debit(&mut self, amount: u64) -> u64 {
        let taken = amount.min(self.coins);
        self.coins -= taken;
        taken
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableCard {
    pub(crate) id: usize,
    pub(crate) role: Role,
}

impl TableCard {
    pub fn new(id: usize, role: Role) -> Self {
        Self { id, role }
    }
}

impl Swappable for TableCard {
    fn name(&self) -> String {
        format!("#{}", self.id)
    }

    fn role(&self) -> Role {
        self.role
    }

    fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}

/// Mutable references to two distinct elements of the same slice.
pub(crate) fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    assert_ne!(a, b, "an entity can't be paired with itself");
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
