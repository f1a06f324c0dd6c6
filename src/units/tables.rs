//! Built-in unit tables.
//!
//! Scales are exact where the unit is defined exactly (international yard
//! and pound, 1959) and otherwise follow NIST SP 811 Appendix B.

use super::{ConversionCategory, Transform, Unit};

/// Every built-in category, in display order.
pub fn all() -> Vec<ConversionCategory> {
    vec![
        length(),
        area(),
        volume(),
        mass(),
        time(),
        temperature(),
        speed(),
        pressure(),
        energy(),
        power(),
        data_storage(),
        angle(),
        frequency(),
        fuel_economy(),
        electrical_resistance(),
        sound_intensity(),
    ]
}

// Tables below are static data that satisfy the category invariants, so
// they bypass the validating constructor.
fn category(id: &str, label: &str, base: &str, units: Vec<Unit>) -> ConversionCategory {
    ConversionCategory {
        id: id.to_owned(),
        label: label.to_owned(),
        base_unit_id: base.to_owned(),
        units,
    }
}

/// Base: meter.
pub fn length() -> ConversionCategory {
    category(
        "length",
        "Length",
        "meter",
        vec![
            Unit::linear("nanometer", "Nanometer", "nm", 1e-9),
            Unit::linear("micrometer", "Micrometer", "µm", 1e-6),
            Unit::linear("millimeter", "Millimeter", "mm", 1e-3),
            Unit::linear("centimeter", "Centimeter", "cm", 1e-2),
            Unit::linear("meter", "Meter", "m", 1.0),
            Unit::linear("kilometer", "Kilometer", "km", 1e3),
            Unit::linear("inch", "Inch", "in", 0.0254),
            Unit::linear("foot", "Foot", "ft", 0.3048),
            Unit::linear("yard", "Yard", "yd", 0.9144),
            Unit::linear("mile", "Mile", "mi", 1609.344),
            Unit::linear("nautical_mile", "Nautical mile", "nmi", 1852.0),
            Unit::linear("light_year", "Light year", "ly", 9.460_730_472_580_8e15),
        ],
    )
}

/// Base: square meter.
pub fn area() -> ConversionCategory {
    category(
        "area",
        "Area",
        "square_meter",
        vec![
            Unit::linear("square_millimeter", "Square millimeter", "mm²", 1e-6),
            Unit::linear("square_centimeter", "Square centimeter", "cm²", 1e-4),
            Unit::linear("square_meter", "Square meter", "m²", 1.0),
            Unit::linear("hectare", "Hectare", "ha", 1e4),
            Unit::linear("square_kilometer", "Square kilometer", "km²", 1e6),
            Unit::linear("square_inch", "Square inch", "in²", 6.4516e-4),
            Unit::linear("square_foot", "Square foot", "ft²", 0.092_903_04),
            Unit::linear("square_yard", "Square yard", "yd²", 0.836_127_36),
            Unit::linear("acre", "Acre", "ac", 4_046.856_422_4),
            Unit::linear("square_mile", "Square mile", "mi²", 2_589_988.110_336),
        ],
    )
}

/// Base: liter.
pub fn volume() -> ConversionCategory {
    category(
        "volume",
        "Volume",
        "liter",
        vec![
            Unit::linear("milliliter", "Milliliter", "mL", 1e-3),
            Unit::linear("liter", "Liter", "L", 1.0),
            Unit::linear("cubic_meter", "Cubic meter", "m³", 1e3),
            Unit::linear("teaspoon", "Teaspoon (US)", "tsp", 4.928_921_593_75e-3),
            Unit::linear("tablespoon", "Tablespoon (US)", "tbsp", 1.478_676_478_125e-2),
            Unit::linear("fluid_ounce", "Fluid ounce (US)", "fl oz", 2.957_352_956_25e-2),
            Unit::linear("cup", "Cup (US)", "cup", 0.236_588_236_5),
            Unit::linear("pint", "Pint (US)", "pt", 0.473_176_473),
            Unit::linear("quart", "Quart (US)", "qt", 0.946_352_946),
            Unit::linear("gallon", "Gallon (US)", "gal", 3.785_411_784),
            Unit::linear("imperial_gallon", "Gallon (imperial)", "imp gal", 4.546_09),
            Unit::linear("cubic_foot", "Cubic foot", "ft³", 28.316_846_592),
        ],
    )
}

/// Base: kilogram.
pub fn mass() -> ConversionCategory {
    category(
        "mass",
        "Mass",
        "kilogram",
        vec![
            Unit::linear("milligram", "Milligram", "mg", 1e-6),
            Unit::linear("gram", "Gram", "g", 1e-3),
            Unit::linear("kilogram", "Kilogram", "kg", 1.0),
            Unit::linear("tonne", "Tonne", "t", 1e3),
            Unit::linear("ounce", "Ounce", "oz", 0.028_349_523_125),
            Unit::linear("pound", "Pound", "lb", 0.453_592_37),
            Unit::linear("stone", "Stone", "st", 6.350_293_18),
            Unit::linear("short_ton", "Short ton (US)", "ton", 907.184_74),
            Unit::linear("long_ton", "Long ton (UK)", "LT", 1_016.046_908_8),
            Unit::linear("carat", "Carat", "ct", 2e-4),
        ],
    )
}

/// Base: second.
pub fn time() -> ConversionCategory {
    category(
        "time",
        "Time",
        "second",
        vec![
            Unit::linear("nanosecond", "Nanosecond", "ns", 1e-9),
            Unit::linear("microsecond", "Microsecond", "µs", 1e-6),
            Unit::linear("millisecond", "Millisecond", "ms", 1e-3),
            Unit::linear("second", "Second", "s", 1.0),
            Unit::linear("minute", "Minute", "min", 60.0),
            Unit::linear("hour", "Hour", "h", 3_600.0),
            Unit::linear("day", "Day", "d", 86_400.0),
            Unit::linear("week", "Week", "wk", 604_800.0),
            Unit::linear("year", "Year (Julian)", "yr", 31_557_600.0),
        ],
    )
}

/// Base: degree Celsius. Every other scale carries an offset.
pub fn temperature() -> ConversionCategory {
    category(
        "temperature",
        "Temperature",
        "celsius",
        vec![
            Unit::linear("celsius", "Celsius", "°C", 1.0),
            Unit::new(
                "fahrenheit",
                "Fahrenheit",
                Some("°F"),
                Transform::Affine {
                    scale: 5.0 / 9.0,
                    offset: -160.0 / 9.0,
                },
            ),
            Unit::new(
                "kelvin",
                "Kelvin",
                Some("K"),
                Transform::Affine {
                    scale: 1.0,
                    offset: -273.15,
                },
            ),
            Unit::new(
                "rankine",
                "Rankine",
                Some("°R"),
                Transform::Affine {
                    scale: 5.0 / 9.0,
                    offset: -273.15,
                },
            ),
            Unit::linear("reaumur", "Réaumur", "°Ré", 1.25),
        ],
    )
}

/// Base: meter per second.
pub fn speed() -> ConversionCategory {
    category(
        "speed",
        "Speed",
        "meter_per_second",
        vec![
            Unit::linear("meter_per_second", "Meter per second", "m/s", 1.0),
            Unit::linear("km_per_hour", "Kilometer per hour", "km/h", 1.0 / 3.6),
            Unit::linear("mile_per_hour", "Mile per hour", "mph", 0.447_04),
            Unit::linear("foot_per_second", "Foot per second", "ft/s", 0.3048),
            Unit::linear("knot", "Knot", "kn", 1852.0 / 3600.0),
            Unit::linear("mach", "Mach (sea level, 15 °C)", "Ma", 340.294),
        ],
    )
}

/// Base: pascal.
pub fn pressure() -> ConversionCategory {
    category(
        "pressure",
        "Pressure",
        "pascal",
        vec![
            Unit::linear("pascal", "Pascal", "Pa", 1.0),
            Unit::linear("kilopascal", "Kilopascal", "kPa", 1e3),
            Unit::linear("megapascal", "Megapascal", "MPa", 1e6),
            Unit::linear("bar", "Bar", "bar", 1e5),
            Unit::linear("millibar", "Millibar", "mbar", 100.0),
            Unit::linear("atmosphere", "Standard atmosphere", "atm", 101_325.0),
            Unit::linear("psi", "Pound per square inch", "psi", 6_894.757_293_168),
            Unit::linear("torr", "Torr", "Torr", 101_325.0 / 760.0),
            Unit::linear("mmhg", "Millimeter of mercury", "mmHg", 133.322_387_415),
        ],
    )
}

/// Base: joule.
pub fn energy() -> ConversionCategory {
    category(
        "energy",
        "Energy",
        "joule",
        vec![
            Unit::linear("joule", "Joule", "J", 1.0),
            Unit::linear("kilojoule", "Kilojoule", "kJ", 1e3),
            Unit::linear("calorie", "Calorie (thermochemical)", "cal", 4.184),
            Unit::linear("kilocalorie", "Kilocalorie", "kcal", 4_184.0),
            Unit::linear("watt_hour", "Watt hour", "Wh", 3_600.0),
            Unit::linear("kilowatt_hour", "Kilowatt hour", "kWh", 3.6e6),
            Unit::linear("electronvolt", "Electronvolt", "eV", 1.602_176_634e-19),
            Unit::linear("btu", "British thermal unit", "BTU", 1_055.055_852_62),
            Unit::linear("foot_pound", "Foot-pound", "ft·lbf", 1.355_817_948_331_400_4),
        ],
    )
}

/// Base: watt.
pub fn power() -> ConversionCategory {
    category(
        "power",
        "Power",
        "watt",
        vec![
            Unit::linear("milliwatt", "Milliwatt", "mW", 1e-3),
            Unit::linear("watt", "Watt", "W", 1.0),
            Unit::linear("kilowatt", "Kilowatt", "kW", 1e3),
            Unit::linear("megawatt", "Megawatt", "MW", 1e6),
            Unit::linear("horsepower", "Horsepower (mechanical)", "hp", 745.699_871_582_270_2),
            Unit::linear("metric_horsepower", "Horsepower (metric)", "PS", 735.498_75),
            Unit::linear("btu_per_hour", "BTU per hour", "BTU/h", 0.293_071_070_172_222_2),
        ],
    )
}

/// Base: byte. Decimal and binary prefixes side by side.
pub fn data_storage() -> ConversionCategory {
    const KI: f64 = 1024.0;
    category(
        "data_storage",
        "Data storage",
        "byte",
        vec![
            Unit::linear("bit", "Bit", "b", 0.125),
            Unit::linear("byte", "Byte", "B", 1.0),
            Unit::linear("kilobyte", "Kilobyte", "kB", 1e3),
            Unit::linear("megabyte", "Megabyte", "MB", 1e6),
            Unit::linear("gigabyte", "Gigabyte", "GB", 1e9),
            Unit::linear("terabyte", "Terabyte", "TB", 1e12),
            Unit::linear("kibibyte", "Kibibyte", "KiB", KI),
            Unit::linear("mebibyte", "Mebibyte", "MiB", KI * KI),
            Unit::linear("gibibyte", "Gibibyte", "GiB", KI * KI * KI),
            Unit::linear("tebibyte", "Tebibyte", "TiB", KI * KI * KI * KI),
        ],
    )
}

/// Base: degree.
pub fn angle() -> ConversionCategory {
    category(
        "angle",
        "Angle",
        "degree",
        vec![
            Unit::linear("degree", "Degree", "°", 1.0),
            Unit::linear("radian", "Radian", "rad", 180.0 / std::f64::consts::PI),
            Unit::linear("gradian", "Gradian", "gon", 0.9),
            Unit::linear("arcminute", "Arcminute", "′", 1.0 / 60.0),
            Unit::linear("arcsecond", "Arcsecond", "″", 1.0 / 3600.0),
            Unit::linear("turn", "Turn", "tr", 360.0),
        ],
    )
}

/// Base: hertz. Period is the reciprocal of frequency.
pub fn frequency() -> ConversionCategory {
    category(
        "frequency",
        "Frequency",
        "hertz",
        vec![
            Unit::linear("hertz", "Hertz", "Hz", 1.0),
            Unit::linear("kilohertz", "Kilohertz", "kHz", 1e3),
            Unit::linear("megahertz", "Megahertz", "MHz", 1e6),
            Unit::linear("gigahertz", "Gigahertz", "GHz", 1e9),
            Unit::linear("rpm", "Revolutions per minute", "rpm", 1.0 / 60.0),
            Unit::new(
                "period_second",
                "Period (seconds)",
                Some("s"),
                Transform::Reciprocal { scale: 1.0 },
            ),
            Unit::new(
                "period_millisecond",
                "Period (milliseconds)",
                Some("ms"),
                Transform::Reciprocal { scale: 1e3 },
            ),
        ],
    )
}

/// Base: kilometer per liter. Consumption per distance is reciprocal.
pub fn fuel_economy() -> ConversionCategory {
    category(
        "fuel_economy",
        "Fuel economy",
        "km_per_liter",
        vec![
            Unit::linear("km_per_liter", "Kilometer per liter", "km/L", 1.0),
            Unit::new(
                "liter_per_100km",
                "Liter per 100 km",
                Some("L/100 km"),
                Transform::Reciprocal { scale: 100.0 },
            ),
            Unit::linear("mpg_us", "Miles per gallon (US)", "mpg", 1.609_344 / 3.785_411_784),
            Unit::linear("mpg_imperial", "Miles per gallon (imperial)", "mpg (imp)", 1.609_344 / 4.546_09),
        ],
    )
}

/// Base: ohm. Conductance is the reciprocal of resistance.
pub fn electrical_resistance() -> ConversionCategory {
    category(
        "electrical_resistance",
        "Resistance / conductance",
        "ohm",
        vec![
            Unit::linear("milliohm", "Milliohm", "mΩ", 1e-3),
            Unit::linear("ohm", "Ohm", "Ω", 1.0),
            Unit::linear("kiloohm", "Kiloohm", "kΩ", 1e3),
            Unit::linear("megaohm", "Megaohm", "MΩ", 1e6),
            Unit::new("siemens", "Siemens", Some("S"), Transform::Reciprocal { scale: 1.0 }),
            Unit::new(
                "millisiemens",
                "Millisiemens",
                Some("mS"),
                Transform::Reciprocal { scale: 1e3 },
            ),
            Unit::new(
                "microsiemens",
                "Microsiemens",
                Some("µS"),
                Transform::Reciprocal { scale: 1e6 },
            ),
        ],
    )
}

/// Threshold of hearing, in W/m².
const REFERENCE_INTENSITY: f64 = 1e-12;

fn decibel_to_intensity(db: f64) -> f64 {
    REFERENCE_INTENSITY * 10f64.powf(db / 10.0)
}

fn intensity_to_decibel(w: f64) -> f64 {
    10.0 * (w / REFERENCE_INTENSITY).log10()
}

fn bel_to_intensity(b: f64) -> f64 {
    REFERENCE_INTENSITY * 10f64.powf(b)
}

fn intensity_to_bel(w: f64) -> f64 {
    (w / REFERENCE_INTENSITY).log10()
}

/// Base: watt per square meter. Decibel and bel are logarithmic.
pub fn sound_intensity() -> ConversionCategory {
    category(
        "sound_intensity",
        "Sound intensity",
        "watt_per_m2",
        vec![
            Unit::linear("watt_per_m2", "Watt per square meter", "W/m²", 1.0),
            Unit::linear("microwatt_per_cm2", "Microwatt per square centimeter", "µW/cm²", 1e-2),
            Unit::new(
                "decibel",
                "Decibel (SIL)",
                Some("dB"),
                Transform::Custom {
                    forward: decibel_to_intensity,
                    inverse: intensity_to_decibel,
                },
            ),
            Unit::new(
                "bel",
                "Bel (SIL)",
                Some("B"),
                Transform::Custom {
                    forward: bel_to_intensity,
                    inverse: intensity_to_bel,
                },
            ),
        ],
    )
}
