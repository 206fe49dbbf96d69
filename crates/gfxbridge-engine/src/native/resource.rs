use std::fmt;

/// A native handle whose lifetime is managed by [`NativeResource`].
///
/// The handle itself owns nothing; it is an index into the renderer's global
/// handle space.
///
/// # Safety
/// Implementors must return a fresh, live handle from `create` each call.
pub unsafe trait NativeHandle: Copy + fmt::Debug {
    /// Short name used in diagnostics.
    const KIND: &'static str;

    fn create() -> Self;

    /// Releases the handle on the native side.
    ///
    /// # Safety
    /// `self` must come from `create` and must not have been destroyed already.
    unsafe fn destroy(self);
}

/// Owns exactly one native handle: created on construction, destroyed once
/// when dropped or passed to [`destroy`](Self::destroy).
///
/// Operations on the handle are added as inherent impls on
/// `NativeResource<ConcreteHandle>`.
pub struct NativeResource<H: NativeHandle> {
    handle: H,
}

impl<H: NativeHandle> NativeResource<H> {
    pub fn new() -> Self {
        let handle = H::create();
        log::trace!("created {} {:?}", H::KIND, handle);
        Self { handle }
    }

    pub fn handle(&self) -> H {
        self.handle
    }

    /// Destroys the resource now. Equivalent to dropping it.
    pub fn destroy(self) {
        drop(self);
    }
}

impl<H: NativeHandle> Default for NativeResource<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: NativeHandle> Drop for NativeResource<H> {
    fn drop(&mut self) {
        log::trace!("destroying {} {:?}", H::KIND, self.handle);
        // SAFETY: the handle came from `H::create` in `new`, and `drop` runs once.
        unsafe { self.handle.destroy() };
    }
}

impl<H: NativeHandle> fmt::Debug for NativeResource<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeResource").field(&self.handle).finish()
    }
}
