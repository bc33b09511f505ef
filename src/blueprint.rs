//! Typed room list, strict validation and SVG rendering

use serde::{Deserialize, Serialize};
use log::debug;

pub const CANVAS_WIDTH: u32 = 1000;
pub const CANVAS_HEIGHT: u32 = 800;

/// One rectangular room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room
{   pub name: String
  , pub x: f64
  , pub y: f64
  , pub width: f64
  , pub height: f64
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Blueprint
{   pub rooms: Vec<Room>
}

impl Blueprint
{   /// Deserialize and check every room.
    ///
    /// Names must be non-blank, coordinates finite, sizes positive.
    pub fn from_value(value: &serde_json::Value)
      -> Result<Self, crate::error::Error>
    {   let blueprint: Blueprint = serde_json::from_value(value.clone())
          .map_err(|e| {
            crate::error::Error::SchemaMismatch(e.to_string())
          })?;
        for (index, room) in blueprint.rooms.iter().enumerate()
        {   room.check().map_err(|reason| {
              crate::error::Error::SchemaMismatch(
                format!("room {}: {}", index, reason)
              )
            })?;
        }
        debug!("Blueprint has {} valid rooms", blueprint.rooms.len());
        Ok(blueprint)
    }
}

impl Room
{   fn check(&self) -> Result<(), String>
    {   if self.name.trim().is_empty()
        {   return Err("name is blank".to_string());
        }
        if !(self.x.is_finite() && self.y.is_finite())
        {   return Err("position is not finite".to_string());
        }
        if !(self.width.is_finite() && self.width > 0.0)
        {   return Err(format!("width {} is not positive", self.width));
        }
        if !(self.height.is_finite() && self.height > 0.0)
        {   return Err(format!("height {} is not positive", self.height));
        }
        Ok(())
    }
}

fn escape_xml(text: &str) -> String
{   let mut out = String::with_capacity(text.len());
    for ch in text.chars()
    {   match ch
        {   '&' => out.push_str("&amp;")
          , '<' => out.push_str("&lt;")
          , '>' => out.push_str("&gt;")
          , '"' => out.push_str("&quot;")
          , '\'' => out.push_str("&apos;")
          , _ => out.push(ch)
        }
    }
    out
}

/// Outline every room with its label in the top-left corner
pub fn render_svg(blueprint: &Blueprint) -> String
{   let mut svg = format!(
      r#"<svg width="{}" height="{}" xmlns="http://www.w3.org/2000/svg">"#,
      CANVAS_WIDTH, CANVAS_HEIGHT
    );

    for room in &blueprint.rooms
    {   svg.push_str(&format!(
          r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="black" stroke-width="2"/>"#,
          room.x, room.y, room.width, room.height
        ));
        svg.push_str(&format!(
          r#"<text x="{}" y="{}" font-size="14">{}</text>"#,
          room.x + 10.0,
          room.y + 20.0,
          escape_xml(&room.name)
        ));
    }

    svg.push_str("</svg>");
    svg
}
