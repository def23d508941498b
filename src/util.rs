/// Which child slot of its parent a node occupies.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    /// How much a parent's balance factor moves when the subtree on this side grows by one level.
    /// Balance factors are `height(right) - height(left)`, so growing on the left pulls it down.
    pub(crate) fn growth(self) -> i8 {
        match self {
            Side::Left => -1,
            Side::Right => 1,
        }
    }

    /// How much a parent's balance factor moves when the subtree on this side shrinks by one
    /// level.
    pub(crate) fn shrink(self) -> i8 {
        -self.growth()
    }
}
