use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

use crate::entities::ImageId;

/// Set of images with an annotation attempt under way.
#[derive(Debug, Default, Clone)]
pub(crate) struct InFlightGuard {
    in_flight: Arc<Mutex<HashSet<ImageId>>>,
}

/// Held for the duration of one attempt; releases the image on drop.
#[derive(Debug)]
pub(crate) struct InFlightTicket {
    in_flight: Arc<Mutex<HashSet<ImageId>>>,
    image_id: ImageId,
}

impl InFlightGuard {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns `None` if an attempt for this image is already running.
    pub(crate) fn acquire(&self, image_id: &ImageId) -> Option<InFlightTicket> {
        let mut set = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        set.insert(image_id.clone()).then(|| InFlightTicket {
            in_flight: Arc::clone(&self.in_flight),
            image_id: image_id.clone(),
        })
    }
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.image_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_refused_until_release() {
        let guard = InFlightGuard::new();
        let id = ImageId::from("img");

        let ticket = guard.acquire(&id).unwrap();
        assert!(guard.acquire(&id).is_none());
        assert!(guard.acquire(&ImageId::from("other")).is_some());

        drop(ticket);
        assert!(guard.acquire(&id).is_some());
    }
}
