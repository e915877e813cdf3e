use serde::Deserialize;

/// * `fuel_capacity` - Fuel the car starts with and is refilled to during a pit stop
/// * `tyre_cost` - Time penalty factor of worn tyres (only displayed during playback)
#[derive(Debug, Deserialize, Clone)]
pub struct CarPars {
    pub fuel_capacity: f64,
    pub tyre_cost: f64,
}

/// Car of the fleet. The identity of a car is its position in the fleet, `car_no` is that
/// position counted from 1 for display purposes.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub car_no: u32,
    pub fuel_capacity: f64,
    pub tyre_cost: f64,
}

impl Car {
    pub fn new(fleet_idx: usize, car_pars: &CarPars) -> Car {
        Car {
            car_no: fleet_idx as u32 + 1,
            fuel_capacity: car_pars.fuel_capacity,
            tyre_cost: car_pars.tyre_cost,
        }
    }
}
