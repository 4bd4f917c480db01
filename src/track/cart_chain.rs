use super::TrackManager;

pub type CartChainId = u32;
pub type CartId = u32;

/// Read access to cart chains owned by the caller's cart system.
pub trait CartChains {
    /// Position of `cart` within `chain`, front cart first.
    fn cart_index(&self, chain: CartChainId, cart: CartId) -> Option<usize>;

    /// Global t of the cart at `index` in `chain`.
    fn cart_dist_along_track(&self, chain: CartChainId, index: usize) -> Option<f32>;
}

impl TrackManager {
    /// Global t that `cart` should follow: the cart ahead of it, or for the
    /// lead cart the one behind. `None` if the chain or cart is unknown or
    /// the chain has no second cart.
    pub fn cart_target_dist_along_track_in_chain(
        &self,
        chains: &impl CartChains,
        chain: CartChainId,
        cart: CartId,
    ) -> Option<f32> {
        let index = chains.cart_index(chain, cart)?;
        let target = if index == 0 { 1 } else { index - 1 };
        chains.cart_dist_along_track(chain, target)
    }
}
