pub const SHELL: &str = "min-h-screen w-full bg-black text-white overflow-hidden flex flex-col";

// Landing
pub const LANDING: &str = "flex-1 flex flex-col items-center justify-center p-4 md:p-6 text-center";
pub const EYEBROW: &str = "mb-3 md:mb-4 px-4 py-1 rounded-full border border-yellow-600/30 bg-yellow-900/10 text-yellow-500 text-[10px] tracking-[0.4em] uppercase font-bold";
pub const LANDING_TITLE: &str = "text-4xl md:text-[140px] font-black mb-4 md:mb-10 tracking-tighter uppercase italic leading-[0.8]";
pub const LANDING_TAGLINE: &str = "mt-8 text-white/40 text-xs tracking-[0.3em] uppercase";
pub const WHEEL_BUTTON: &str = "relative group cursor-pointer w-[200px] h-[200px] md:w-[380px] md:h-[380px] flex items-center justify-center shrink-0 focus:outline-none";

// Wheel
pub const WHEEL_FACE: &str = "w-[170px] h-[170px] md:w-[300px] md:h-[300px] rounded-full relative flex items-center justify-center overflow-hidden";
pub const WHEEL_DIVIDER: &str = "absolute top-0 left-1/2 h-1/2 w-px bg-black/40 origin-bottom";
pub const WHEEL_HUB: &str = "z-10 w-16 h-16 md:w-28 md:h-28 rounded-full relative flex flex-col items-center justify-center bg-neutral-900 ring-2 ring-[#c5a059]";
pub const WHEEL_HUB_TEXT: &str = "text-[#c5a059] font-black tracking-widest text-sm md:text-xl";
pub const WHEEL_ICON: &str = "absolute top-2 left-1/2 -translate-x-1/2 text-xs md:text-base";
pub const POINTER: &str = "absolute -top-3 left-1/2 -translate-x-1/2 z-20 w-0 h-0 border-l-[10px] border-r-[10px] border-t-[20px] border-l-transparent border-r-transparent border-t-[#c5a059]";

// Spinning
pub const SPINNING: &str = "flex-1 flex flex-col items-center justify-center p-6 relative";
pub const DECIDING: &str = "mt-8 text-[#c5a059] tracking-[0.4em] uppercase text-xs animate-pulse";
pub const REVEAL_OVERLAY: &str = "absolute inset-0 z-30 flex items-center justify-center bg-black/90 animate-fade-in";
pub const REVEAL_CARD: &str = "text-center px-6";
pub const REVEAL_EYEBROW: &str = "text-[#c5a059] text-xs tracking-[0.5em] uppercase mb-4";
pub const REVEAL_TITLE: &str = "text-4xl md:text-7xl font-black uppercase italic tracking-tighter";
pub const REVEAL_SUBTITLE: &str = "mt-4 text-white/60 italic";

// Storyboard
pub const STORYBOARD: &str = "relative flex-1 flex min-h-screen";
pub const SCENE_MEDIA: &str = "absolute inset-0 w-full h-full object-cover opacity-45";
pub const SCENE_PLACEHOLDER: &str = "absolute inset-0 bg-gradient-to-br from-neutral-900 to-black animate-pulse";
pub const SCENE_CONTENT: &str = "relative z-10 w-full max-w-3xl mx-auto flex flex-col justify-center p-6 md:p-12";
pub const PROGRESS: &str = "flex items-center gap-2 mb-8";
pub const PROGRESS_STEP: &str = "w-8 h-8 rounded-full border flex items-center justify-center text-[10px] font-bold";
pub const PROGRESS_BAR: &str = "w-8 h-px";
pub const SCENE_LABEL: &str = "text-xs tracking-[0.4em] uppercase font-bold";
pub const SCENE_SUBLABEL: &str = "block mt-1 text-white/40 text-xs italic";
pub const SCENE_TITLE: &str = "mt-6 text-3xl md:text-6xl font-black uppercase italic tracking-tighter";
pub const SCENE_TAGLINE: &str = "mt-2 text-white/50 italic";
pub const NARRATIVE_CARD: &str = "mt-8 rounded-2xl p-6 md:p-8 backdrop-blur-md border space-y-1";
pub const LINE_ACTIVE: &str = "text-lg md:text-2xl font-bold text-white leading-snug";
pub const LINE_PAST: &str = "text-xs md:text-sm font-medium text-white/35 leading-relaxed";
pub const ACTIONS: &str = "mt-8 flex items-center justify-between";
pub const CATEGORY: &str = "text-[10px] tracking-[0.3em] uppercase text-white/40";
pub const BUTTON_CONTINUE: &str = "px-6 py-3 rounded-full border border-white/20 text-sm font-semibold hover:bg-white/10 transition-all duration-300";
pub const BUTTON_SPIN_AGAIN: &str = "px-6 py-3 rounded-full text-black text-sm font-bold bg-gradient-to-r from-[#c5a059] to-[#e8c878] shadow-lg transition-all duration-300";

pub const CARD_ERROR: &str = "m-8 bg-red-900/50 border border-red-800 rounded-lg p-4 text-red-200";

pub const CUSTOM_CSS: &str = r#"
@keyframes fade-in {
    0% { opacity: 0; }
    100% { opacity: 1; }
}

.animate-fade-in {
    animation: fade-in 0.7s ease-out;
}

.opacity-45 {
    opacity: 0.45;
}
"#;
