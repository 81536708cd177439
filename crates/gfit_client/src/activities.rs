//! Activity codes reported by activity segment data points.
//!
//! See <https://developers.google.com/fit/rest/v1/reference/activity-types>.

macro_rules! activities {
    ($($variant:ident = $code:literal => $name:literal,)+) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Activity {
            $($variant,)+
        }

        impl Activity {
            pub const ALL: &'static [Activity] = &[$(Activity::$variant,)+];

            pub fn code(&self) -> u8 {
                match self {
                    $(Activity::$variant => $code,)+
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(Activity::$variant => $name,)+
                }
            }

            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some(Activity::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

activities! {
    InVehicle = 0 => "in_vehicle",
    Biking = 1 => "biking",
    OnFoot = 2 => "on_foot",
    Still = 3 => "still",
    Unknown = 4 => "unknown",
    Tilting = 5 => "tilting",
    Walking = 7 => "walking",
    Running = 8 => "running",
    Aerobics = 9 => "aerobics",
    Badminton = 10 => "badminton",
    Baseball = 11 => "baseball",
    Basketball = 12 => "basketball",
    Biathlon = 13 => "biathlon",
    Handbiking = 14 => "handbiking",
    MountainBiking = 15 => "mountain_biking",
    RoadBiking = 16 => "road_biking",
    Spinning = 17 => "spinning",
    StationaryBiking = 18 => "stationary_biking",
    UtilityBiking = 19 => "utility_biking",
    Boxing = 20 => "boxing",
    Calisthenics = 21 => "calisthenics",
    CircuitTraining = 22 => "circuit_training",
    Cricket = 23 => "cricket",
    Dancing = 24 => "dancing",
    Elliptical = 25 => "elliptical",
    Fencing = 26 => "fencing",
    FootballAmerican = 27 => "football_american",
    FootballAustralian = 28 => "football_australian",
    FootballSoccer = 29 => "football_soccer",
    Frisbee = 30 => "frisbee",
    Gardening = 31 => "gardening",
    Golf = 32 => "golf",
    Gymnastics = 33 => "gymnastics",
    Handball = 34 => "handball",
    Hiking = 35 => "hiking",
    Hockey = 36 => "hockey",
    HorsebackRiding = 37 => "horseback_riding",
    Housework = 38 => "housework",
    JumpingRope = 39 => "jumping_rope",
    Kayaking = 40 => "kayaking",
    KettlebellTraining = 41 => "kettlebell_training",
    Kickboxing = 42 => "kickboxing",
    Kitesurfing = 43 => "kitesurfing",
    MartialArts = 44 => "martial_arts",
    Meditation = 45 => "meditation",
    MixedMartialArts = 46 => "mixed_martial_arts",
    P90xExercises = 47 => "p90x_exercises",
    Paragliding = 48 => "paragliding",
    Pilates = 49 => "pilates",
    Polo = 50 => "polo",
    Racquetball = 51 => "racquetball",
    RockClimbing = 52 => "rock_climbing",
    Rowing = 53 => "rowing",
    RowingMachine = 54 => "rowing_machine",
    Rugby = 55 => "rugby",
    Jogging = 56 => "jogging",
    RunningOnSand = 57 => "running_on_sand",
    RunningTreadmill = 58 => "running_treadmill",
    Sailing = 59 => "sailing",
    ScubaDiving = 60 => "scuba_diving",
    Skateboarding = 61 => "skateboarding",
    Skating = 62 => "skating",
    CrossSkating = 63 => "cross_skating",
    InlineSkating = 64 => "inline_skating",
    Skiing = 65 => "skiing",
    BackCountrySkiing = 66 => "back_country_skiing",
    CrossCountrySkiing = 67 => "cross_country_skiing",
    DownhillSkiing = 68 => "downhill_skiing",
    KiteSkiing = 69 => "kite_skiing",
    RollerSkiing = 70 => "roller_skiing",
    Sledding = 71 => "sledding",
    Sleeping = 72 => "sleeping",
    Snowboarding = 73 => "snowboarding",
    Snowmobile = 74 => "snowmobile",
    Snowshoeing = 75 => "snowshoeing",
    Squash = 76 => "squash",
    StairClimbing = 77 => "stair_climbing",
    StairClimbingMachine = 78 => "stair_climbing_machine",
    StandUpPaddleboarding = 79 => "stand_up_paddleboarding",
    StrengthTraining = 80 => "strength_training",
    Surfing = 81 => "surfing",
    Swimming = 82 => "swimming",
    SwimmingPool = 83 => "swimming_pool",
    SwimmingOpenWater = 84 => "swimming_open_water",
    TableTennis = 85 => "table_tennis",
    TeamSports = 86 => "team_sports",
    Tennis = 87 => "tennis",
    Treadmill = 88 => "treadmill",
    Volleyball = 89 => "volleyball",
    VolleyballBeach = 90 => "volleyball_beach",
    VolleyballIndoor = 91 => "volleyball_indoor",
    Wakeboarding = 92 => "wakeboarding",
    WalkingFitness = 93 => "walking_fitness",
    NordicWalking = 94 => "nordic_walking",
    WalkingTreadmill = 95 => "walking_treadmill",
    Waterpolo = 96 => "waterpolo",
    Weightlifting = 97 => "weightlifting",
    Wheelchair = 98 => "wheelchair",
    Windsurfing = 99 => "windsurfing",
    Yoga = 100 => "yoga",
    Diving = 102 => "diving",
    Ergometer = 103 => "ergometer",
    IceSkating = 104 => "ice_skating",
    IndoorSkating = 105 => "indoor_skating",
    Curling = 106 => "curling",
    OtherUnclassified = 108 => "other_unclassified",
    LightSleep = 109 => "light_sleep",
    DeepSleep = 110 => "deep_sleep",
    RemSleep = 111 => "rem_sleep",
    AwakeDuringSleep = 112 => "awake_during_sleep",
}

impl Activity {
    /// Activities we know how to export.
    pub fn is_supported(&self) -> bool {
        self.mfp_id().is_some()
    }

    /// MyFitnessPal exercise id.
    pub fn mfp_id(&self) -> Option<u64> {
        match self {
            Activity::Biking => Some(19),
            // walking, 12.5 mins per km, moderate pace
            Activity::Walking => Some(26688321),
            // running (jogging), 10.7 kph
            Activity::Running => Some(127),
            _ => None,
        }
    }
}

impl std::fmt::Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_activities() {
        for a in [Activity::Biking, Activity::Walking, Activity::Running] {
            assert!(a.is_supported(), "{a} should be supported");
        }
        assert!(!Activity::Unknown.is_supported());
        assert!(!Activity::Sleeping.is_supported());
    }

    #[test]
    fn mfp_ids() {
        assert_eq!(Activity::Biking.mfp_id(), Some(19));
        assert_eq!(Activity::Walking.mfp_id(), Some(26688321));
        assert_eq!(Activity::Running.mfp_id(), Some(127));
        assert_eq!(Activity::Sleeping.mfp_id(), None);
    }

    #[test]
    fn codes_round_trip_through_table() {
        for a in Activity::ALL {
            assert_eq!(Activity::from_code(a.code() as i64), Some(*a));
        }
        assert_eq!(Activity::from_code(10), Some(Activity::Badminton));
        assert_eq!(Activity::from_code(6), None);
        assert_eq!(Activity::from_code(101), None);
        assert_eq!(Activity::from_code(-1), None);
    }
}
