//! Build guide assembly.
//!
//! Orders the fixed cover, contents and fifteen sections. Every quantity
//! comes from the [`Specification`] as a [`FieldValue`]; the only numbers
//! written here as text are fixed shop practice (valve sizes, curing
//! temperatures) that do not depend on the design.

use crate::calculations::cut_list::{Panel, PanelProfile};
use crate::calculations::door::{DoorLocation, DoorOpening};
use crate::calculations::specification::{FieldValue, SpecField, Specification};
use crate::config::ForgeConfig;
use crate::drawing::{DiagramSet, ViewKind};
use crate::runs;

use super::{Cover, Document, Inline, Node, Runs, Section};

// ============================================================================
// Helpers
// ============================================================================

fn v(spec: &Specification, field: SpecField) -> Inline {
    Inline::Value(spec.value(field))
}

fn len(inches: f64) -> Inline {
    Inline::Value(FieldValue::length(inches))
}

fn count(n: u32) -> Inline {
    Inline::Value(FieldValue::Count(n))
}

fn heading(text: &str) -> Node {
    Node::Heading { text: text.to_string() }
}

fn paragraph(runs: Runs) -> Node {
    Node::Paragraph { runs }
}

fn bullets(items: &[&str]) -> Node {
    Node::Bullets {
        items: items.iter().map(|item| runs![*item]).collect(),
    }
}

fn steps(items: Vec<Runs>) -> Node {
    Node::Steps { items }
}

fn text_steps(items: &[&str]) -> Node {
    steps(items.iter().map(|item| runs![*item]).collect())
}

fn table(headers: &[&str], rows: Vec<Vec<Runs>>) -> Node {
    Node::Table {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

fn text_rows<const N: usize>(rows: &[[&str; N]]) -> Vec<Vec<Runs>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| runs![*cell]).collect())
        .collect()
}

fn diagram_if_present(nodes: &mut Vec<Node>, diagrams: &DiagramSet, view: ViewKind) {
    if diagrams.view(view).is_some() {
        nodes.push(Node::Diagram { view });
    }
}

fn section(number: u32, title: &str, nodes: Vec<Node>) -> Section {
    Section {
        number,
        title: title.to_string(),
        nodes,
    }
}

// ============================================================================
// Sections
// ============================================================================

fn cover(spec: &Specification, config: &ForgeConfig) -> Cover {
    let facts = [
        ("Chamber volume", SpecField::Volume),
        ("Door configuration", SpecField::DoorConfiguration),
        ("External width", SpecField::ExternalWidth),
        ("External height", SpecField::ExternalHeight),
        ("External length", SpecField::ExternalLength),
        ("Burner holes", SpecField::BurnerHoles),
        ("Blower", SpecField::RecommendedCfm),
        ("Estimated cost", SpecField::EstimatedCost),
    ];
    let mut facts: Vec<(String, FieldValue)> =
        facts.iter().map(|(label, field)| (label.to_string(), spec.value(*field))).collect();
    facts.push((
        "Drawing set".to_string(),
        FieldValue::Text(format!("{} rev {}", config.layout.drawing_prefix, config.layout.revision)),
    ));
    Cover {
        title: "Ribbon Burner Forge".to_string(),
        subtitle: "Complete Build Guide".to_string(),
        facts,
    }
}

fn safety() -> Section {
    section(
        1,
        "Safety Requirements & Warnings",
        vec![
            Node::Warning {
                runs: runs![
                    Inline::strong("CRITICAL SAFETY INFORMATION. "),
                    "This forge burns combustible gas at high temperature. Improper construction or \
                     operation can result in fire, explosion, severe burns, carbon monoxide poisoning \
                     or death. Read every requirement below before starting construction."
                ],
            },
            heading("Required Safety Equipment"),
            bullets(&[
                "ABC-rated fire extinguisher within arm's reach during operation",
                "Safety glasses at all times near an operating forge",
                "Leather gloves, 14\" gauntlet style minimum",
                "Leather apron or jacket",
                "Hearing protection against blower noise",
                "Steel-toed boots",
                "Face shield for forge welding",
            ]),
            heading("Workspace Requirements"),
            bullets(&[
                "NEVER operate indoors or in an enclosed space",
                "Minimum 10' x 10' clear area around the forge",
                "Concrete, gravel or dirt floor, no wood decking",
                "Minimum 8' overhead clearance with no combustible ceiling",
                "Remove all combustibles within 5' of the forge",
                "Install a CO detector in adjacent enclosed spaces",
                "Ensure adequate ventilation even outdoors",
            ]),
            heading("Gas System Safety"),
            bullets(&[
                "Leak test every connection with soapy water before each use for the first month",
                "Use only fittings and hoses rated for propane",
                "Install a shutoff valve within reach of the operating position",
                "NEVER use PTFE tape on flare fittings",
                "Keep the propane tank upright and secured",
                "Store spare tanks outdoors, away from the forge",
                "Replace any hose showing wear, cracking or damage",
            ]),
            heading("Emergency Procedures"),
            Node::Bullets {
                items: vec![
                    runs![
                        Inline::strong("Gas leak: "),
                        "close the tank valve, evacuate, ventilate, and do not operate electrical switches"
                    ],
                    runs![
                        Inline::strong("Fire outside the forge: "),
                        "close the gas valve, use the extinguisher, call emergency services if not controlled at once"
                    ],
                    runs![
                        Inline::strong("Blower failure: "),
                        "close the gas valve IMMEDIATELY, gas accumulates without airflow"
                    ],
                    runs![
                        Inline::strong("Burns: "),
                        "cool with water, seek medical attention for burns larger than 2\" or on the face, hands or joints"
                    ],
                    runs![
                        Inline::strong("CO symptoms (headache, dizziness): "),
                        "leave the area, get fresh air, seek medical attention"
                    ],
                ],
            },
        ],
    )
}

fn overview(spec: &Specification, diagrams: &DiagramSet) -> Section {
    let mut nodes = vec![paragraph(runs![
        "This forge has a ",
        v(spec, SpecField::Volume),
        " internal chamber fired by a ",
        v(spec, SpecField::BurnerHoles),
        "-hole ribbon burner. The body is bolted together, so it can be taken apart completely for \
         maintenance and repair. Door arrangement: ",
        v(spec, SpecField::DoorConfiguration),
        "."
    ])];

    diagram_if_present(&mut nodes, diagrams, ViewKind::Front);
    diagram_if_present(&mut nodes, diagrams, ViewKind::SideSection);
    for problem in &diagrams.degraded {
        nodes.push(Node::Warning {
            runs: runs![Inline::strong("Drawing not to scale. "), problem.to_string()],
        });
    }

    nodes.push(heading("Dimensional Specifications"));
    nodes.push(table(
        &["Measurement", "Internal", "External"],
        vec![
            vec![runs!["Width"], runs![v(spec, SpecField::InternalWidth)], runs![v(spec, SpecField::ExternalWidth)]],
            vec![runs!["Height"], runs![v(spec, SpecField::InternalHeight)], runs![v(spec, SpecField::ExternalHeight)]],
            vec![runs!["Length"], runs![v(spec, SpecField::InternalLength)], runs![v(spec, SpecField::ExternalLength)]],
            vec![runs!["Volume"], runs![v(spec, SpecField::Volume)], runs!["-"]],
            vec![runs!["Insulation"], runs![v(spec, SpecField::Insulation)], runs!["Ceramic blanket + IFB"]],
        ],
    ));

    nodes.push(heading("System Specifications"));
    nodes.push(table(
        &["System", "Specification", "Notes"],
        vec![
            vec![
                runs!["Ribbon burner"],
                runs![v(spec, SpecField::BurnerHoles), " holes (", v(spec, SpecField::HoleDiameter), ")"],
                runs![v(spec, SpecField::BurnerLength), " casting length"],
            ],
            vec![
                runs!["Blower"],
                runs![v(spec, SpecField::RecommendedCfm)],
                runs!["Static pressure ", v(spec, SpecField::StaticPressure)],
            ],
            vec![
                runs!["Refractory"],
                runs![v(spec, SpecField::RefractoryProduct)],
                runs![v(spec, SpecField::RefractoryBags), " bags (", v(spec, SpecField::BagWeight), ")"],
            ],
            vec![
                runs!["Ceramic blanket"],
                runs![v(spec, SpecField::BlanketArea)],
                runs![v(spec, SpecField::BlanketThickness), " thickness"],
            ],
            vec![runs!["Heat input"], runs![v(spec, SpecField::HeatInput)], runs!["Approximate"]],
            vec![
                runs!["Front door"],
                runs![v(spec, SpecField::FrontDoorWidth), " x ", v(spec, SpecField::FrontDoorHeight)],
                runs!["Sliding firebrick"],
            ],
        ],
    ));

    section(2, "Design Overview & Specifications", nodes)
}

fn bill_of_materials(spec: &Specification, config: &ForgeConfig) -> Section {
    let housing_stock = runs![
        v(spec, SpecField::BurnerWidth),
        " x ",
        v(spec, SpecField::BurnerWidth),
        " square tube"
    ];
    let steel = vec![
        vec![
            runs![v(spec, SpecField::PlateThickness), " steel plate"],
            runs![v(spec, SpecField::PlateCount), " pieces"],
            runs!["See cut list"],
        ],
        vec![
            runs![config.frame.angle_stock.as_str(), " angle iron"],
            runs![v(spec, SpecField::AngleIronTotal)],
            runs!["Frame corners and rails"],
        ],
        vec![housing_stock, runs![v(spec, SpecField::HousingLength)], runs!["Burner housing"]],
        vec![runs!["1.5\" pipe"], runs!["24-36\""], runs!["Air inlet"]],
        vec![runs!["1/4\" pipe"], runs!["12\""], runs!["Gas injection"]],
        vec![runs!["1/8\" sheet steel"], runs!["4 sq ft"], runs!["Door frames, baffle"]],
        vec![runs!["1/2\" round rod"], runs!["24\""], runs!["Door tracks, handles"]],
    ];

    let refractory = vec![
        vec![
            runs!["Ceramic fiber blanket ", v(spec, SpecField::BlanketThickness)],
            runs![v(spec, SpecField::BlanketArea)],
            runs!["Wall and ceiling lining"],
        ],
        vec![
            runs![v(spec, SpecField::RefractoryProduct)],
            runs![v(spec, SpecField::RefractoryBags), " bags"],
            runs![v(spec, SpecField::RefractoryWeight), " for the lining shell"],
        ],
        vec![
            runs!["IFB (insulating firebrick)"],
            runs![v(spec, SpecField::TotalFirebricks), " bricks"],
            runs![
                v(spec, SpecField::FloorFirebricks),
                " floor, ",
                v(spec, SpecField::DoorFirebricks),
                " doors"
            ],
        ],
        vec![runs!["Rigidizer"], runs!["1-2 quarts"], runs!["Seal blanket surface"]],
        vec![runs!["ITC-100 (optional)"], runs!["1 pint"], runs!["IR reflective coating"]],
        vec![runs!["Stainless pins/staples"], runs!["50-100"], runs!["Secure blanket"]],
    ];

    let mut hardware = text_rows(&[["5/16\" or 3/8\" bolts", "40-50", "Grade 5+, 4 per corner"]]);
    hardware.push(vec![
        runs!["Forge blower"],
        runs!["1"],
        runs![v(spec, SpecField::RecommendedCfm), ", ", v(spec, SpecField::StaticPressure)],
    ]);
    hardware.extend(text_rows(&[
        ["1.5\" gate valve", "1", "Air control"],
        ["Variable speed controller", "1", "Ceiling fan type (NOT a lamp dimmer)"],
        ["Propane regulator", "1", "0-30 PSI adjustable"],
        ["Pressure gauge", "1", "0-15 PSI"],
        ["1/4\" ball valve", "1", "Main gas shutoff"],
        ["1/4\" needle valve", "1", "Fine adjustment"],
        ["1/4\" solenoid valve", "1", "Safety, wired to blower power"],
        ["Fire extinguisher", "1", "ABC rated, 5 lb or larger"],
    ]));

    section(
        3,
        "Bill of Materials",
        vec![
            paragraph(runs!["Estimated material cost: ", v(spec, SpecField::EstimatedCost), "."]),
            heading("Steel"),
            table(&["Item", "Quantity", "Notes"], steel),
            heading("Refractory & Insulation"),
            table(&["Item", "Quantity", "Purpose"], refractory),
            heading("Hardware & Gas Train"),
            table(&["Item", "Quantity", "Notes"], hardware),
        ],
    )
}

/// Cut-list note for a plate, built from its cutout sizes
fn panel_note(panel: &Panel) -> Runs {
    match &panel.profile {
        PanelProfile::Closed { cutouts } if cutouts.is_empty() => runs!["Plain"],
        PanelProfile::Closed { cutouts } => {
            let mut note = Runs::new();
            for (i, c) in cutouts.iter().enumerate() {
                if i > 0 {
                    note.push("; ".into());
                }
                note.extend(runs![len(c.width_in), " x ", len(c.height_in), " ", c.purpose.label()]);
            }
            note
        }
        PanelProfile::OpenEdge { notch } => runs![
            len(notch.width_in),
            " x ",
            len(notch.depth_in),
            " slot open at top edge"
        ],
    }
}

fn cut_list(spec: &Specification) -> Section {
    let plates = spec
        .cut_list
        .panels
        .iter()
        .map(|p| {
            vec![
                runs![p.name()],
                runs![count(p.quantity)],
                runs![len(p.width_in)],
                runs![len(p.height_in)],
                panel_note(p),
            ]
        })
        .collect();
    let angle = spec
        .cut_list
        .frame_members
        .iter()
        .map(|m| vec![runs![m.name.as_str()], runs![count(m.quantity)], runs![len(m.length_in)]])
        .collect();

    section(
        4,
        "Steel Cut List",
        vec![
            heading("Plate"),
            table(&["Panel", "Qty", "Width", "Height", "Notes"], plates),
            heading("Angle Iron"),
            table(&["Component", "Qty", "Length"], angle),
            paragraph(runs!["Total angle iron: ", v(spec, SpecField::AngleIronTotal), "."]),
            heading("Cutting Notes"),
            bullets(&[
                "Cut angle iron ends at 45 degrees for mitered corners",
                "Drill bolt holes 1/64\" oversize for alignment tolerance",
                "Deburr all cut edges before assembly",
                "Use the angle iron as the drilling template for plate holes",
            ]),
        ],
    )
}

fn body_construction(spec: &Specification, diagrams: &DiagramSet) -> Section {
    let mut nodes = vec![paragraph(runs![
        "The body is bolted angle-iron construction. All ",
        v(spec, SpecField::PlateCount),
        " plates bolt to the inside of the angle frame, so any panel can be removed later."
    ])];
    diagram_if_present(&mut nodes, diagrams, ViewKind::Rear);
    nodes.push(heading("Assembly Sequence"));
    nodes.push(steps(vec![
        runs!["Cut all angle iron to length per the cut list"],
        runs!["Drill bolt holes in the angle iron at 3-4\" spacing"],
        runs!["Dry fit the angle frame without plates"],
        runs!["Check the frame is square by measuring both diagonals"],
        runs!["Use the frame as the template to drill plate holes"],
        runs!["Cut the door opening in the front panel"],
        runs![
            "Cut the ",
            v(spec, SpecField::BurnerPortLength),
            " x ",
            v(spec, SpecField::BurnerPortWidth),
            " burner port in the top panel, centered ",
            v(spec, SpecField::BurnerPortOffset),
            " from the front edge"
        ],
        runs!["Bolt the bottom panel to the frame first"],
        runs!["Attach both side panels"],
        runs!["Install the front and rear panels"],
        runs!["Leave the top panel off until the lining is installed"],
    ]));
    section(5, "Forge Body Construction", nodes)
}

fn burner(spec: &Specification, diagrams: &DiagramSet) -> Section {
    let pitch = len(spec.burner.hole_pitch_in);
    let mut nodes = vec![
        paragraph(runs![
            "The ribbon burner spreads the flame over ",
            v(spec, SpecField::BurnerHoles),
            " ports, sized for the ",
            v(spec, SpecField::Volume),
            " chamber."
        ]),
        heading("Burner Specifications"),
        table(
            &["Component", "Specification"],
            vec![
                vec![
                    runs!["Housing"],
                    runs![
                        v(spec, SpecField::BurnerWidth),
                        " square tube, ",
                        v(spec, SpecField::HousingLength),
                        " long"
                    ],
                ],
                vec![runs!["Air inlet"], runs!["1.5\" pipe, 6\" stub"]],
                vec![
                    runs!["Refractory head"],
                    runs![
                        v(spec, SpecField::BurnerLength),
                        " x ",
                        v(spec, SpecField::BurnerWidth),
                        " x ",
                        v(spec, SpecField::BurnerWidth),
                        " deep"
                    ],
                ],
                vec![
                    runs!["Flame holes"],
                    runs![v(spec, SpecField::BurnerHoles), " holes, ", v(spec, SpecField::HoleDiameter), " diameter"],
                ],
                vec![
                    runs!["Hole pattern"],
                    runs![
                        v(spec, SpecField::BurnerRows),
                        " rows of up to ",
                        v(spec, SpecField::HolesPerRow),
                        ", staggered at ",
                        pitch.clone(),
                        " pitch"
                    ],
                ],
                vec![runs!["Gas injection"], runs!["1/4\" pipe into the air stream"]],
                vec![
                    runs!["Top panel port"],
                    runs![v(spec, SpecField::BurnerPortLength), " x ", v(spec, SpecField::BurnerPortWidth)],
                ],
                vec![runs!["Mounting angle"], runs!["30-45 degrees downward into the chamber"]],
            ],
        ),
    ];
    diagram_if_present(&mut nodes, diagrams, ViewKind::BurnerDetail);
    nodes.push(heading("Casting the Refractory Head"));
    nodes.push(steps(vec![
        runs![
            "Build a mold ",
            v(spec, SpecField::BurnerLength),
            " x ",
            v(spec, SpecField::BurnerWidth),
            " x ",
            v(spec, SpecField::BurnerWidth),
            " deep from plywood or melamine"
        ],
        runs![
            "Insert ",
            v(spec, SpecField::BurnerHoles),
            " drinking straws in ",
            v(spec, SpecField::BurnerRows),
            " rows of up to ",
            v(spec, SpecField::HolesPerRow)
        ],
        runs!["Space the straws ", pitch, " apart, offsetting alternate rows by half a pitch"],
        runs!["Mix ", v(spec, SpecField::RefractoryProduct), " to a peanut butter consistency"],
        runs!["Pack the refractory firmly around the straws"],
        runs!["Tap or vibrate the mold to release air bubbles"],
        runs!["Cure 24-48 hours before demolding"],
        runs!["Remove the straws by pulling or burning them out"],
        runs!["Oven cure at 200°F for 2 hours, then 350°F for 2 hours"],
        runs!["Mount the head in the housing with refractory cement"],
    ]));
    section(6, "Ribbon Burner Assembly", nodes)
}

fn opening_size(door: Option<&DoorOpening>) -> Runs {
    match door {
        Some(d) => runs![len(d.width_in), " x ", len(d.height_in)],
        None => runs!["-"],
    }
}

/// Door hardware cell; a slot has no door to build
fn door_hardware(door: Option<&DoorOpening>, pick: fn(&DoorOpening) -> Runs) -> Runs {
    match door {
        Some(d) if d.has_door() => pick(d),
        Some(_) => runs!["Open slot, no door"],
        None => runs!["-"],
    }
}

fn frame_size(d: &DoorOpening) -> Runs {
    runs![len(d.frame_width_in), " x ", len(d.frame_height_in)]
}

fn track_length(d: &DoorOpening) -> Runs {
    runs![len(d.track_length_in)]
}

fn doors(spec: &Specification) -> Section {
    let front = spec.doors.iter().find(|d| d.location == DoorLocation::Front);
    let rear = spec.doors.iter().find(|d| d.location != DoorLocation::Front);
    let rear_header = match rear.map(|d| d.location) {
        Some(DoorLocation::Rear) => "Rear Door",
        Some(DoorLocation::RearSlot) => "Rear Slot",
        _ => "Rear",
    };

    let rows = vec![
        vec![runs!["Opening"], opening_size(front), opening_size(rear)],
        vec![
            runs!["Door frame"],
            door_hardware(front, frame_size),
            door_hardware(rear, frame_size),
        ],
        vec![
            runs!["Track length"],
            door_hardware(front, track_length),
            door_hardware(rear, track_length),
        ],
    ];

    section(
        7,
        "Sliding Door System",
        vec![
            paragraph(runs![
                "Sliding firebrick doors hold heat well and work one-handed. Each door hangs from a round \
                 rod track above its opening. This design uses ",
                v(spec, SpecField::DoorAssemblies),
                " door assemblies with ",
                v(spec, SpecField::DoorFirebricks),
                " firebricks in total."
            ]),
            heading("Door Specifications"),
            table(&["Feature", "Front Door", rear_header], rows),
            heading("Door Construction"),
            text_steps(&[
                "Weld 1/8\" angle iron into a rectangular door frame",
                "Add a tube or pipe hanger on top to ride the rod",
                "Cut firebricks to fit inside the frame",
                "Secure the bricks with high-temperature cement or wire",
                "Weld a handle to one side",
                "Weld rod supports above the door opening",
                "Install the 1/2\" round rod through the supports",
                "Hang the door and test the slide action",
            ]),
        ],
    )
}

fn frame_details(spec: &Specification) -> Section {
    let members = spec
        .cut_list
        .frame_members
        .iter()
        .map(|m| {
            vec![
                runs![m.name.as_str()],
                runs![count(m.quantity)],
                runs![len(m.length_in)],
                runs![m.stock.as_str()],
            ]
        })
        .collect();

    section(
        8,
        "Bolted Frame Details",
        vec![
            paragraph(runs![
                "Corner posts run the full external height of ",
                v(spec, SpecField::ExternalHeight),
                ". Rails butt against the posts, so each rail is shorter than the panel edge it \
                 supports by the width of two angle legs. Plates are ",
                v(spec, SpecField::PlateThickness),
                " thick and bolt through the outer leg of the angle."
            ]),
            table(&["Member", "Qty", "Length", "Stock"], members),
            heading("Bolting Pattern"),
            bullets(&[
                "Four bolts per corner joint, two through each leg",
                "Bolts at 3-4\" spacing along every rail and post",
                "Grade 5 or better hardware with lock washers",
                "Nuts inside the frame so plates can be lifted off from outside",
                "Retorque all bolts after the first two curing fires",
            ]),
            Node::Warning {
                runs: runs![
                    Inline::strong("Do not weld the body. "),
                    "The bolted frame lets the steel move with heat cycling and allows the lining to be replaced."
                ],
            },
        ],
    )
}

fn air_and_gas(spec: &Specification) -> Section {
    let mut air = vec![
        vec![runs!["Blower"], runs![v(spec, SpecField::RecommendedCfm), " centrifugal forge blower"]],
        vec![
            runs!["Airflow"],
            runs![
                v(spec, SpecField::RequiredCfm),
                " required, ",
                v(spec, SpecField::RecommendedCfm),
                " with margin"
            ],
        ],
        vec![runs!["Static pressure"], runs![v(spec, SpecField::StaticPressure), " minimum"]],
    ];
    air.extend(text_rows(&[
        ["Pipe size", "1.5\" throughout"],
        ["Gate valve", "1.5\" for coarse air control"],
        ["Speed controller", "Ceiling fan type (NOT a lamp dimmer)"],
        ["Flex connection", "1.5\" silicone hose, 12-18\""],
    ]));

    let gas = text_rows(&[
        ["Propane tank", "20-100 lb cylinder"],
        ["Regulator", "Adjustable 0-30 PSI"],
        ["Pressure gauge", "0-15 PSI"],
        ["Main shutoff", "1/4\" ball valve"],
        ["Solenoid valve", "1/4\" normally closed, wired to blower power"],
        ["Needle valve", "1/4\" for fine adjustment"],
        ["Gas line", "1/4\" black iron or approved propane hose"],
        ["Operating pressure", "5-10 PSI typical"],
    ]);

    section(
        9,
        "Air & Gas Supply Systems",
        vec![
            heading("Air Supply"),
            table(&["Component", "Specification"], air),
            heading("Gas Supply"),
            table(&["Component", "Specification"], gas),
            Node::Warning {
                runs: runs![
                    Inline::strong("SAFETY: "),
                    "wire the gas solenoid to blower power so gas cannot flow with the blower off. Leak \
                     test the whole gas system with soapy water before first use."
                ],
            },
        ],
    )
}

fn lining(spec: &Specification) -> Section {
    section(
        10,
        "Refractory Lining & Curing",
        vec![
            heading("Lining Installation"),
            steps(vec![
                runs!["Cut ceramic blanket to fit the chamber: ", v(spec, SpecField::BlanketArea), " in total"],
                runs![
                    "Lay the floor first: ",
                    v(spec, SpecField::FloorFirebricks),
                    " IFB on a thin bed of refractory cement"
                ],
                runs!["Line the walls with ", v(spec, SpecField::BlanketThickness), " ceramic blanket"],
                runs!["Pin the blanket with stainless pins every 4-6\""],
                runs!["Line the ceiling the same way, leaving the burner port clear"],
                runs![
                    "Coat the blanket with ",
                    v(spec, SpecField::RefractoryProduct),
                    " to ",
                    v(spec, SpecField::Insulation),
                    " total wall thickness"
                ],
                runs!["Apply rigidizer to all exposed blanket (wear a respirator)"],
                runs!["Let everything dry completely, at least 24 hours"],
                runs!["Optional: apply ITC-100 for IR reflection, then bolt on the top panel"],
            ]),
            heading("Curing Schedule"),
            paragraph(runs![Inline::strong("Improper curing cracks the refractory."), " Follow this schedule:"]),
            table(
                &["Day", "Temperature", "Duration", "Notes"],
                text_rows(&[
                    ["1", "200-300°F", "2-3 hours", "Low flame, doors open"],
                    ["2", "400-500°F", "2-3 hours", "Doors cracked"],
                    ["3", "700-800°F", "2-3 hours", "Doors partially closed"],
                    ["4", "1000-1200°F", "2-3 hours", "Normal operation"],
                    ["5+", "Full heat", "As needed", "Ready for use"],
                ]),
            ),
            paragraph(runs![
                "Steam during the first fires is normal, and so are cracking sounds. Do not rush the cure."
            ]),
        ],
    )
}

fn assembly(spec: &Specification) -> Section {
    let burner_step = runs![
        "Bolt the top panel on and seat the burner in its port, centered ",
        v(spec, SpecField::BurnerPortOffset),
        " from the front edge"
    ];

    let mut items = vec![
        runs!["Complete the body (section 5) and verify the frame is square"],
        runs!["Install the lining and let it dry (section 10)"],
        burner_step,
        runs!["Seal around the burner housing with refractory cement"],
        runs!["Connect the blower through the gate valve and silicone flex hose"],
        runs!["Plumb the gas train: tank, regulator, gauge, ball valve, solenoid, needle valve, injector"],
        runs!["Wire the solenoid to the blower circuit and confirm it closes when the blower stops"],
    ];
    for door in spec.doors.iter().filter(|d| d.has_door()) {
        items.push(runs![
            "Mount the ",
            len(door.track_length_in),
            " track and hang the ",
            door.location.label().to_lowercase()
        ]);
    }
    items.push(runs!["Leak test every gas joint with soapy water"]);
    items.push(runs!["Run the curing schedule before the first working fire"]);

    section(
        11,
        "Assembly Instructions",
        vec![
            paragraph(runs![
                "Final assembly brings the body, burner, doors and supply systems together. The finished \
                 forge measures ",
                v(spec, SpecField::ExternalWidth),
                " wide, ",
                v(spec, SpecField::ExternalHeight),
                " high and ",
                v(spec, SpecField::ExternalLength),
                " long."
            ]),
            steps(items),
        ],
    )
}

fn operation() -> Section {
    section(
        12,
        "Operation Procedures",
        vec![
            heading("Startup"),
            text_steps(&[
                "Inspect the forge and gas connections, leak test if needed",
                "Make sure the fire extinguisher is within reach",
                "Clear the area of combustibles",
                "Position the doors for the opening you need",
                "Open the air gate valve fully",
                "Start the blower and wait 10-15 seconds",
                "Open the main gas ball valve",
                "Slowly open the needle valve",
                "Light at the door opening with a long lighter or torch",
                "Adjust gas for the heat you need",
                "Fine-tune air for a proper flame",
            ]),
            heading("Shutdown"),
            text_steps(&[
                "Close the needle valve",
                "Close the main gas ball valve",
                "Keep the blower running 60 seconds to purge the chamber",
                "Turn off the blower",
                "Leave the doors cracked until cool",
                "Never move the forge while hot",
            ]),
        ],
    )
}

fn flame_tuning() -> Section {
    section(
        13,
        "Flame Tuning Guide",
        vec![
            paragraph(runs![
                "The air to fuel ratio sets the forge atmosphere. Tune it for efficient heating and clean work."
            ]),
            table(
                &["Flame Type", "Appearance", "Use"],
                text_rows(&[
                    ["Neutral", "Short blue cones, purple tips", "General forging"],
                    ["Reducing", "Longer flames, orange/yellow streaks", "Forge welding, minimizes scale"],
                    ["Oxidizing", "Short, loud, hissing blue", "Maximum heat, heavy scale"],
                ]),
            ),
            heading("Tuning Adjustments"),
            Node::Bullets {
                items: vec![
                    runs![Inline::strong("Too much scale: "), "reduce air for a more reducing atmosphere"],
                    runs![Inline::strong("Not reaching temperature: "), "increase gas, close the doors more"],
                    runs![Inline::strong("Flame blowing out: "), "reduce both air and gas, let the forge warm up"],
                    runs![Inline::strong("Loud roaring: "), "too much air, reduce blower speed"],
                    runs![Inline::strong("Lazy yellow flames: "), "not enough air, increase blower speed"],
                ],
            },
        ],
    )
}

fn troubleshooting() -> Section {
    section(
        14,
        "Troubleshooting",
        vec![table(
            &["Problem", "Possible Causes", "Solutions"],
            text_rows(&[
                ["Won't ignite", "No gas, no spark, wrong air/gas mix", "Check gas valve, test igniter, reduce air"],
                ["Flame blows out", "Too much air, forge cold", "Reduce air, preheat with a low flame"],
                ["Won't reach temperature", "Gas leak, poor insulation, doors open", "Leak test, check blanket, close doors"],
                ["Uneven heating", "Blocked holes, burner angle", "Clear holes, adjust mount angle"],
                ["Excessive scale", "Oxidizing atmosphere", "Reduce air, increase gas slightly"],
                ["High fuel use", "Gas leak, damaged insulation", "Leak test, repair lining"],
                ["Door binding", "Scale buildup, bent track", "Clean track, check alignment"],
                ["Bolts loosening", "Thermal cycling", "Lock washers, retorque after curing"],
                ["Smoke from chamber", "Contamination, flux residue", "Clean chamber, normal with flux"],
                ["Blower overheating", "Blocked inlet, undersized blower", "Clear obstructions, check CFM rating"],
            ]),
        )],
    )
}

fn maintenance(spec: &Specification) -> Section {
    section(
        15,
        "Maintenance Schedule",
        vec![
            heading("After Each Use"),
            bullets(&[
                "Inspect the chamber for damage",
                "Remove scale and debris from the floor",
                "Check door operation",
            ]),
            heading("Monthly (heavy use)"),
            bullets(&[
                "Check all bolts for tightness",
                "Inspect door firebricks for cracks",
                "Clean the sliding tracks",
                "Leak test gas connections",
            ]),
            heading("Quarterly"),
            bullets(&[
                "Inspect ceramic blanket condition",
                "Check burner holes for blockage",
                "Inspect the floor for wear",
                "Clean the blower intake",
            ]),
            heading("Annually"),
            bullets(&[
                "Remove the top panel for a full chamber inspection",
                "Replace damaged refractory",
                "Reapply rigidizer to worn areas",
                "Replace door firebricks as needed",
                "Deep clean the entire forge",
            ]),
            heading("Expected Performance"),
            table(
                &["Parameter", "Specification"],
                vec![
                    vec![runs!["Heat-up time"], runs!["10-15 minutes to 2000°F"]],
                    vec![runs!["Maximum temperature"], runs!["2400-2500°F (welding heat)"]],
                    vec![runs!["Even heating zone"], runs!["About ", v(spec, SpecField::EvenHeatZone), " under the burner"]],
                    vec![runs!["Operating pressure"], runs!["5-10 PSI propane"]],
                    vec![runs!["Operating cost"], runs!["About $1-3 per hour, varies with propane prices"]],
                ],
            ),
        ],
    )
}

// ============================================================================
// Assembly
// ============================================================================

/// Assemble the build guide.
///
/// Diagram nodes are emitted only for views present in `diagrams`, and every
/// degraded view gets a warning next to the drawings.
pub fn assemble(spec: &Specification, diagrams: &DiagramSet, config: &ForgeConfig) -> Document {
    let sections = vec![
        safety(),
        overview(spec, diagrams),
        bill_of_materials(spec, config),
        cut_list(spec),
        body_construction(spec, diagrams),
        burner(spec, diagrams),
        doors(spec),
        frame_details(spec),
        air_and_gas(spec),
        lining(spec),
        assembly(spec),
        operation(),
        flame_tuning(),
        troubleshooting(),
        maintenance(spec),
    ];
    tracing::debug!(sections = sections.len(), "assembled build guide");

    Document {
        cover: cover(spec, config),
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::door::DoorConfiguration;
    use crate::calculations::geometry::{resolve, ChamberInput};
    use crate::calculations::specification::calculate;
    use crate::document::plain_text;
    use crate::drawing::compose;

    fn guide(doors: DoorConfiguration) -> (Specification, DiagramSet, Document) {
        let config = ForgeConfig::default();
        let input = ChamberInput {
            internal_width_in: 7.0,
            internal_height_in: 8.0,
            internal_length_in: 14.0,
            insulation_in: 2.0,
            door_configuration: doors,
        };
        let geometry = resolve(&input, &config).unwrap();
        let spec = calculate(&geometry, doors, &config).unwrap();
        let diagrams = compose(&geometry, &spec, &config).unwrap();
        let document = assemble(&spec, &diagrams, &config);
        (spec, diagrams, document)
    }

    fn all_text(section: &Section) -> String {
        let mut out = String::new();
        for node in &section.nodes {
            match node {
                Node::Heading { text } => out.push_str(text),
                Node::Paragraph { runs } | Node::Warning { runs } => out.push_str(&plain_text(runs)),
                Node::Bullets { items } | Node::Steps { items } => {
                    for item in items {
                        out.push_str(&plain_text(item));
                        out.push('\n');
                    }
                }
                Node::Table { rows, .. } => {
                    for cell in rows.iter().flatten() {
                        out.push_str(&plain_text(cell));
                        out.push('|');
                    }
                }
                Node::Diagram { .. } => {}
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_fifteen_sections_in_order() {
        let (_, _, document) = guide(DoorConfiguration::FrontOnly);
        let contents = document.contents();
        assert_eq!(contents.len(), 15);
        assert_eq!(contents.iter().map(|(n, _)| *n).collect::<Vec<_>>(), (1..=15).collect::<Vec<_>>());
        assert_eq!(contents[0].1, "Safety Requirements & Warnings");
        assert_eq!(contents[7].1, "Bolted Frame Details");
        assert_eq!(contents[10].1, "Assembly Instructions");
        assert_eq!(contents[14].1, "Maintenance Schedule");
    }

    #[test]
    fn test_rear_diagram_only_when_drawn() {
        let (_, _, front_only) = guide(DoorConfiguration::FrontOnly);
        let kinds: Vec<ViewKind> = front_only.diagrams().collect();
        assert_eq!(kinds, vec![ViewKind::Front, ViewKind::SideSection, ViewKind::BurnerDetail]);

        let (_, diagrams, both) = guide(DoorConfiguration::FrontAndRear);
        assert!(diagrams.view(ViewKind::Rear).is_some());
        assert!(both.diagrams().any(|k| k == ViewKind::Rear));
    }

    #[test]
    fn test_burner_section_carries_hole_pattern() {
        let (_, _, document) = guide(DoorConfiguration::FrontOnly);
        let burner = document.section(6).unwrap();
        assert!(burner.nodes.iter().any(|n| matches!(n, Node::Diagram { view: ViewKind::BurnerDetail })));
    }

    #[test]
    fn test_numbers_match_specification() {
        let (spec, _, document) = guide(DoorConfiguration::FrontOnly);
        let overview = all_text(document.section(2).unwrap());
        assert!(overview.contains(&spec.value(SpecField::Volume).to_string()));
        assert!(overview.contains("784 cu in"));
        assert!(overview.contains("44 holes"));

        let air = all_text(document.section(9).unwrap());
        assert!(air.contains("81.7 CFM"));
        assert!(air.contains("3.0 in WC"));

        let bom = all_text(document.section(3).unwrap());
        assert!(bom.contains("$470"));
        assert!(bom.contains("7 bricks"));
    }

    #[test]
    fn test_port_and_plate_quoted_from_specification() {
        let (spec, _, document) = guide(DoorConfiguration::FrontOnly);
        let offset = spec.value(SpecField::BurnerPortOffset).to_string();
        let port = format!(
            "{} x {}",
            spec.value(SpecField::BurnerPortLength),
            spec.value(SpecField::BurnerPortWidth)
        );
        assert_eq!(port, "13.25\" x 3.5\"");

        let body = all_text(document.section(5).unwrap());
        assert!(body.contains(&port));
        assert!(body.contains(&offset));
        assert!(all_text(document.section(6).unwrap()).contains(&port));
        assert!(all_text(document.section(11).unwrap()).contains(&offset));

        let plate = spec.value(SpecField::PlateThickness).to_string();
        assert!(all_text(document.section(3).unwrap()).contains(&format!("{plate} steel plate")));
        assert!(all_text(document.section(8).unwrap()).contains(&format!("Plates are {plate} thick")));
    }

    #[test]
    fn test_cut_list_section_lists_every_plate() {
        let (spec, _, document) = guide(DoorConfiguration::SideLoading);
        let section = document.section(4).unwrap();
        let plates = section.nodes.iter().find_map(|n| match n {
            Node::Table { rows, .. } => Some(rows),
            _ => None,
        });
        assert_eq!(plates.unwrap().len(), spec.cut_list.panels.len());
        assert!(all_text(section).contains("slot open at top edge"));
    }

    #[test]
    fn test_cover_facts() {
        let (_, _, document) = guide(DoorConfiguration::FrontOnly);
        assert_eq!(document.cover.title, "Ribbon Burner Forge");
        let cost = document.cover.facts.iter().find(|(label, _)| label == "Estimated cost");
        assert_eq!(cost.unwrap().1.to_string(), "$470");
    }
}
