use crate::expression::ast::Expr;
use crate::expression::error::{EvalError, ParseError};
use crate::expression::eval::{Bindings, eval, narrow_channel};
use crate::expression::parser::parse_expr;
use crate::foundation::core::Channel;
use crate::foundation::error::{ImgverbError, ImgverbResult};

/// Source text of the four channel expressions.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelSources {
    /// Red channel expression.
    pub red: String,
    /// Green channel expression.
    pub green: String,
    /// Blue channel expression.
    pub blue: String,
    /// Alpha channel expression.
    pub alpha: String,
}

impl ChannelSources {
    /// Use the same expression for every channel.
    pub fn uniform(src: impl Into<String>) -> Self {
        let src = src.into();
        Self {
            red: src.clone(),
            green: src.clone(),
            blue: src.clone(),
            alpha: src,
        }
    }

    /// Expression text for `channel`.
    pub fn get(&self, channel: Channel) -> &str {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
            Channel::Alpha => &self.alpha,
        }
    }
}

/// One parsed channel expression together with its source text.
#[derive(Debug, Clone)]
pub struct ChannelProgram {
    /// Channel this program drives.
    pub channel: Channel,
    /// Expression text as configured, kept for error reporting.
    pub source: String,
    /// Parsed tree.
    pub expr: Expr,
}

/// The four parsed channel programs of a run, in RGBA order.
#[derive(Debug, Clone)]
pub struct ChannelPrograms {
    programs: [ChannelProgram; 4],
}

impl ChannelPrograms {
    /// Parse all four channel expressions.
    ///
    /// Parsing runs concurrently and joins before returning; the first failure in RGBA order
    /// is reported as a config error naming the channel and the expression text.
    #[tracing::instrument(skip(sources))]
    pub fn parse(sources: &ChannelSources) -> ImgverbResult<Self> {
        let parse_one = |c: Channel| -> Result<ChannelProgram, (Channel, ParseError)> {
            let source = sources.get(c);
            parse_expr(source)
                .map(|expr| ChannelProgram {
                    channel: c,
                    source: source.to_owned(),
                    expr,
                })
                .map_err(|e| (c, e))
        };

        let ((r, g), (b, a)) = rayon::join(
            || rayon::join(|| parse_one(Channel::Red), || parse_one(Channel::Green)),
            || rayon::join(|| parse_one(Channel::Blue), || parse_one(Channel::Alpha)),
        );

        let programs = [r, g, b, a].map(|res| {
            res.map_err(|(c, e)| {
                ImgverbError::config(format!(
                    "failed to parse {c} expression `{}`: {e}",
                    sources.get(c)
                ))
            })
        });
        let [r, g, b, a] = programs;
        let programs = [r?, g?, b?, a?];
        tracing::debug!(
            red = %programs[0].expr,
            green = %programs[1].expr,
            blue = %programs[2].expr,
            alpha = %programs[3].expr,
            "parsed channel programs"
        );
        Ok(Self { programs })
    }

    /// Program for `channel`.
    pub fn get(&self, channel: Channel) -> &ChannelProgram {
        &self.programs[channel.index()]
    }

    /// Iterate programs in RGBA order.
    pub fn iter(&self) -> impl Iterator<Item = &ChannelProgram> {
        self.programs.iter()
    }

    /// Evaluate all four channels at the given sample coordinates, narrowing each to 8 bits.
    ///
    /// On failure the offending channel is returned with the evaluator error.
    pub fn eval_rgba(&self, vars: &Bindings) -> Result<[u8; 4], (Channel, EvalError)> {
        let mut out = [0u8; 4];
        for p in &self.programs {
            let v = eval(&p.expr, vars).map_err(|e| (p.channel, e))?;
            out[p.channel.index()] = narrow_channel(v);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/program.rs"]
mod tests;
