mod client;
mod types;

pub use client::{endpoints, ParkingApi};
pub use types::{
    Ack, Booking, BookingStatus, ExtendSession, ExtendedSession, MapLocation, NearbySpotsParams,
    NewBooking, ParkingSpot, SearchSpotsParams, SpotType, SpotsPage, DEFAULT_LOCATION,
};
