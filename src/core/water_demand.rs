use crate::input::Activity;

/// Combined terminal draw for one hour of the modeled year.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HourlyDemand {
    /// Requested volume, in litres.
    pub volume: f64,
    /// Volume-weighted required temperature in deg C; 0 when nothing is
    /// drawn this hour.
    pub temp_required: f64,
}

/// Aggregate the activity schedule for one day-of-week/hour-of-day slot.
///
/// An activity contributes when the day is among its active days
/// (default: every day) and the hour is among its listed hours. Its
/// daily volume is split evenly over the listed hours only; an
/// activity active every day still delivers its full daily volume on
/// each of those days. The required temperature is the volume-weighted
/// average over contributing activities.
///
/// Public so peak-demand reporting can reuse it instead of re-deriving
/// the weighting.
pub fn demand_for_hour(activities: &[Activity], day_of_week: u32, hour_of_day: u32) -> HourlyDemand {
    let mut volume = 0.;
    let mut weighted_temp_sum = 0.;

    for activity in activities {
        if activity.hours.is_empty()
            || !activity.is_active_on(day_of_week)
            || !activity.hours.contains(&hour_of_day)
        {
            continue;
        }
        let hourly_volume = activity.volume / activity.hours.len() as f64;
        volume += hourly_volume;
        weighted_temp_sum += hourly_volume * activity.temp_required;
    }

    if volume > 0. {
        HourlyDemand {
            volume,
            temp_required: weighted_temp_sum / volume,
        }
    } else {
        HourlyDemand::default()
    }
}
